pub mod fallback_handler;
pub mod notification_handler;
pub mod post_handler;
pub mod user_handler;

use crate::util::error::{HandlerError, HandlerErrorKind};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use bson::oid::ObjectId;
use serde::de::DeserializeOwned;
use tracing::debug;

/// `Json` whose rejections come back as `{message}`: 413 for oversized
/// bodies, 400 for everything else.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> HandlerError {
    debug!(status = %rejection.status(), "Rejected request body");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return HandlerError::new(HandlerErrorKind::PayloadTooLarge, "Request body too large");
    }
    HandlerError::bad_request(rejection.body_text())
}

pub(crate) fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(raw).map_err(|_| HandlerError::bad_request(format!("Invalid {} id", what)))
}

pub(crate) fn validation_error(e: validator::ValidationErrors) -> HandlerError {
    HandlerError::bad_request(format!("Validation error: {}", e))
}
