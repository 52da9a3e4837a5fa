use crate::handler::user_handler::{
    all_suggestions_handler, first_login_setup_handler, public_profile_handler,
    suggestions_handler, update_profile_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::user_service::UserServiceImpl;
use axum::{middleware, routing::{get, post, put}, Router};
use std::sync::Arc;

pub fn user_router(service: Arc<UserServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/users/suggestions", get(suggestions_handler))
        .route("/users/suggestions/all", get(all_suggestions_handler))
        .route("/users/profile/{username}", get(public_profile_handler))
        .route("/users/profile", put(update_profile_handler))
        .route("/users/first-login-setup", post(first_login_setup_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
