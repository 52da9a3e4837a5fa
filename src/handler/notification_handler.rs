use crate::dto::MessageResponse;
use crate::handler::parse_object_id;
use crate::middlewares::auth_middleware::AuthUser;
use crate::service::notification_service::{NotificationService, NotificationServiceImpl};
use crate::util::error::HandlerError;
use axum::extract::{Extension, Path, State};
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

pub async fn list_notifications_handler(
    State(service): State<Arc<NotificationServiceImpl>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let notifications = service.list_for_user(&user.id).await?;
    Ok(Json(notifications))
}

pub async fn mark_notification_read_handler(
    State(service): State<Arc<NotificationServiceImpl>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "notification")?;
    let notification = service.mark_as_read(&id, &user.id).await?;
    Ok(Json(notification))
}

pub async fn delete_notification_handler(
    State(service): State<Arc<NotificationServiceImpl>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "notification")?;
    service.delete(&id, &user.id).await?;
    Ok(Json(MessageResponse::new("Notificación borrada exitosamente")))
}
