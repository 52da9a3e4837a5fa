use crate::dto::profile_dto::{FirstLoginSetupResponse, ProfileResponse, UpdateProfileRequest};
use crate::dto::UserSummaryResponse;
use crate::model::user::UserRole;
use crate::repository::user_repo::{UserRepository, UsernamePattern};
use crate::util::error::ServiceError;
use crate::util::media::{is_remote_url, MediaStore, MediaUpload};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, Document};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

const USER_NOT_FOUND: &str = "User not found";

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_public_profile(&self, username: &str) -> Result<ProfileResponse, ServiceError>;
    async fn update_profile(
        &self,
        user_id: &ObjectId,
        request: UpdateProfileRequest,
    ) -> Result<ProfileResponse, ServiceError>;
    async fn complete_first_login_setup(
        &self,
        user_id: &ObjectId,
        role: UserRole,
        company_info: Option<Value>,
    ) -> Result<FirstLoginSetupResponse, ServiceError>;
    async fn suggested_connections(
        &self,
        user_id: &ObjectId,
        limit: i64,
    ) -> Result<Vec<UserSummaryResponse>, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
    pub media_store: Arc<dyn MediaStore>,
}

impl UserServiceImpl {
    pub fn new(user_repo: Arc<dyn UserRepository>, media_store: Arc<dyn MediaStore>) -> Self {
        Self {
            user_repo,
            media_store,
        }
    }

    async fn resolve_image(&self, value: String, folder: &str) -> Result<String, ServiceError> {
        if value.is_empty() || is_remote_url(&value) {
            return Ok(value);
        }
        let upload = MediaUpload::image(&value, folder)?;
        let url = self.media_store.store(upload).await.map_err(|e| {
            error!("Failed to upload {} image: {}", folder, e);
            ServiceError::from(e)
        })?;
        Ok(url)
    }

    async fn resolve_curriculum(&self, value: String, user_id: &ObjectId) -> Result<String, ServiceError> {
        if value.is_empty() || is_remote_url(&value) {
            return Ok(value);
        }
        let upload = MediaUpload::curriculum(&value, user_id, Utc::now().timestamp_millis())?;
        let url = self.media_store.store(upload).await.map_err(|e| {
            error!("Failed to upload curriculum: {}", e);
            ServiceError::from(e)
        })?;
        info!("Curriculum uploaded");
        Ok(format!("{}?dl=1", url))
    }
}

fn company_info_document(value: Value) -> Result<Document, ServiceError> {
    match value {
        Value::Object(map) => bson::to_document(&map)
            .map_err(|e| ServiceError::InvalidInput(format!("Invalid companyInfo: {}", e))),
        Value::Null => Ok(Document::new()),
        _ => Err(ServiceError::InvalidInput("companyInfo must be an object".to_string())),
    }
}

fn to_bson<T: serde::Serialize>(field: &str, value: &T) -> Result<Bson, ServiceError> {
    bson::to_bson(value).map_err(|e| ServiceError::InvalidInput(format!("Invalid {}: {}", field, e)))
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self))]
    async fn get_public_profile(&self, username: &str) -> Result<ProfileResponse, ServiceError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ServiceError::InvalidInput("Username is required".to_string()));
        }

        for pattern in UsernamePattern::cascade(username) {
            if let Some(user) = self.user_repo.find_by_username(&pattern).await? {
                debug!("Profile resolved with {:?}", pattern);
                return Ok(ProfileResponse::from(&user));
            }
        }

        warn!("User not found with username: \"{}\"", username);
        Err(ServiceError::NotFound(USER_NOT_FOUND.to_string()))
    }

    #[instrument(skip(self, request), fields(user_id = %user_id))]
    async fn update_profile(
        &self,
        user_id: &ObjectId,
        request: UpdateProfileRequest,
    ) -> Result<ProfileResponse, ServiceError> {
        let mut fields = Document::new();

        if let Some(name) = request.name {
            fields.insert("name", name);
        }
        if let Some(username) = request.username {
            let username = username.trim();
            if username.is_empty() {
                return Err(ServiceError::InvalidInput("Username cannot be empty".to_string()));
            }
            fields.insert("username", username);
        }
        if let Some(headline) = request.headline {
            fields.insert("headline", headline);
        }
        if let Some(about) = request.about {
            fields.insert("about", about);
        }
        if let Some(location) = request.location {
            fields.insert("location", location);
        }
        if let Some(picture) = request.profile_picture {
            fields.insert("profilePicture", self.resolve_image(picture, "profiles").await?);
        }
        if let Some(banner) = request.banner_img {
            fields.insert("bannerImg", self.resolve_image(banner, "banners").await?);
        }
        if let Some(curriculum) = request.curriculum_img {
            fields.insert("curriculumImg", self.resolve_curriculum(curriculum, user_id).await?);
        }
        if let Some(skills) = request.skills {
            fields.insert("skills", skills);
        }
        if let Some(experience) = request.experience {
            fields.insert("experience", to_bson("experience", &experience)?);
        }
        if let Some(education) = request.education {
            fields.insert("education", to_bson("education", &education)?);
        }
        if let Some(company_info) = request.company_info {
            fields.insert("companyInfo", company_info_document(company_info)?);
        }

        debug!("Updating profile fields: {:?}", fields.keys().collect::<Vec<_>>());
        let user = self
            .user_repo
            .update_fields(user_id, fields)
            .await?
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.to_string()))?;

        info!("Profile updated");
        Ok(ProfileResponse::from(&user))
    }

    #[instrument(skip(self, company_info), fields(user_id = %user_id, role = %role))]
    async fn complete_first_login_setup(
        &self,
        user_id: &ObjectId,
        role: UserRole,
        company_info: Option<Value>,
    ) -> Result<FirstLoginSetupResponse, ServiceError> {
        if role != UserRole::Empresario {
            return Err(ServiceError::Forbidden(
                "Esta acción solo está permitida para usuarios con rol de empresario".to_string(),
            ));
        }

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Usuario no encontrado".to_string()))?;
        if !user.is_first_login {
            return Err(ServiceError::InvalidInput(
                "La configuración inicial ya fue completada".to_string(),
            ));
        }

        let company_info = company_info_document(company_info.unwrap_or(Value::Null))?;
        let updated = self
            .user_repo
            .update_fields(user_id, doc! { "isFirstLogin": false, "companyInfo": company_info })
            .await?
            .ok_or_else(|| ServiceError::NotFound("Usuario no encontrado".to_string()))?;

        info!("First login setup completed");
        Ok(FirstLoginSetupResponse {
            message: "Configuración inicial completada exitosamente".to_string(),
            user: ProfileResponse::from(&updated),
        })
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn suggested_connections(
        &self,
        user_id: &ObjectId,
        limit: i64,
    ) -> Result<Vec<UserSummaryResponse>, ServiceError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.to_string()))?;
        let suggestions = self
            .user_repo
            .find_suggestions(user_id, &user.connections, limit)
            .await?;
        Ok(suggestions.iter().map(UserSummaryResponse::from).collect())
    }
}
