use crate::model::user::{User, UserRole};
use crate::repository::user_repo::UserRepository;
use crate::util::error::HandlerError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub user_repo: Arc<dyn UserRepository>,
    pub cookie_name: String,
}

/// The authenticated requester, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: ObjectId,
    pub role: UserRole,
    pub name: String,
    pub username: String,
    pub profile_picture: String,
}

impl AuthUser {
    fn from_user(id: ObjectId, user: User) -> Self {
        AuthUser {
            id,
            role: user.role,
            name: user.name,
            username: user.username,
            profile_picture: user.profile_picture.unwrap_or_default(),
        }
    }
}

fn request_token(state: &AuthState, req: &Request<Body>) -> Option<String> {
    let headers = req.headers();
    if let Some(auth_header) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Ok(token) = state.jwt_utils.extract_token_from_header(auth_header) {
            return Some(token);
        }
    }
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            state
                .jwt_utils
                .extract_token_from_cookies(cookies, &state.cookie_name)
                .ok()
        })
}

/// Resolves the bearer token or auth cookie to a stored user.
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let token = request_token(&state, &req)
        .ok_or_else(|| HandlerError::unauthorized("Unauthorized - No Token Provided"))?;

    let claims = state.jwt_utils.validate_access_token(&token).map_err(|e| {
        debug!("Rejected access token: {}", e);
        HandlerError::unauthorized("Unauthorized - Invalid Token")
    })?;

    let user_id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| HandlerError::unauthorized("Unauthorized - Invalid Token"))?;

    let user = match state.user_repo.find_by_id(&user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(user_id = %user_id, "Token subject no longer exists");
            return Err(HandlerError::unauthorized("User not found"));
        }
        Err(e) => {
            error!("Failed to load authenticated user: {}", e);
            return Err(HandlerError::internal(e.to_string()));
        }
    };

    req.extensions_mut().insert(AuthUser::from_user(user_id, user));
    Ok(next.run(req).await)
}
