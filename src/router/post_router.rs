use crate::handler::post_handler::{
    comment_handler, create_post_handler, delete_post_handler, feed_handler, get_post_handler,
    like_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::post_service::PostServiceImpl;
use axum::{middleware, routing::{delete, get, post}, Router};
use std::sync::Arc;

pub fn post_router(service: Arc<PostServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/posts", get(feed_handler))
        .route("/posts/create", post(create_post_handler))
        .route("/posts/delete/{id}", delete(delete_post_handler))
        .route("/posts/{id}", get(get_post_handler))
        .route("/posts/{id}/comment", post(comment_handler))
        .route("/posts/{id}/like", post(like_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
