use crate::handler::notification_handler::{
    delete_notification_handler, list_notifications_handler, mark_notification_read_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::notification_service::NotificationServiceImpl;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;

pub fn notification_router(service: Arc<NotificationServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/notifications", get(list_notifications_handler))
        .route(
            "/notifications/{id}",
            axum::routing::patch(mark_notification_read_handler).delete(delete_notification_handler),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
