use crate::dto::profile_dto::{FirstLoginSetupRequest, SuggestionQuery, UpdateProfileRequest};
use crate::handler::{validation_error, ApiJson};
use crate::middlewares::auth_middleware::AuthUser;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::HandlerError;
use axum::extract::{Extension, Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

const SUGGESTIONS_LIMIT: i64 = 5;
const ALL_SUGGESTIONS_LIMIT: i64 = 50;

pub async fn suggestions_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SuggestionQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let suggestions = service
        .suggested_connections(&user.id, query.limit_or(SUGGESTIONS_LIMIT))
        .await?;
    Ok(Json(suggestions))
}

pub async fn all_suggestions_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SuggestionQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let suggestions = service
        .suggested_connections(&user.id, query.limit_or(ALL_SUGGESTIONS_LIMIT))
        .await?;
    Ok(Json(suggestions))
}

pub async fn public_profile_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let profile = service.get_public_profile(&username).await?;
    Ok(Json(profile))
}

pub async fn update_profile_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(validation_error)?;
    debug!(username = %user.username, "Profile update requested");
    let profile = service.update_profile(&user.id, payload).await?;
    Ok(Json(profile))
}

pub async fn first_login_setup_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<FirstLoginSetupRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let response = service
        .complete_first_login_setup(&user.id, user.role, payload.company_info)
        .await?;
    Ok(Json(response))
}
