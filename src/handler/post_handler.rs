use crate::dto::post_dto::{CommentRequest, CreatePostRequest};
use crate::dto::MessageResponse;
use crate::handler::{parse_object_id, validation_error, ApiJson};
use crate::middlewares::auth_middleware::AuthUser;
use crate::service::post_service::{PostService, PostServiceImpl};
use crate::util::error::HandlerError;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use validator::Validate;

pub async fn feed_handler(
    State(service): State<Arc<PostServiceImpl>>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.feed(&user.id).await?))
}

pub async fn create_post_handler(
    State(service): State<Arc<PostServiceImpl>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<CreatePostRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(validation_error)?;
    let post = service.create_post(&user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_post_handler(
    State(service): State<Arc<PostServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "post")?;
    Ok(Json(service.get_post(&id).await?))
}

pub async fn delete_post_handler(
    State(service): State<Arc<PostServiceImpl>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "post")?;
    service.delete_post(&id, &user.id, user.role).await?;
    Ok(Json(MessageResponse::new("Post eliminado exitosamente")))
}

pub async fn comment_handler(
    State(service): State<Arc<PostServiceImpl>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<CommentRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "post")?;
    payload.validate().map_err(validation_error)?;
    let post = service.comment(&id, &user.id, &payload.content).await?;
    Ok(Json(post))
}

pub async fn like_handler(
    State(service): State<Arc<PostServiceImpl>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "post")?;
    Ok(Json(service.toggle_like(&id, &user.id).await?))
}
