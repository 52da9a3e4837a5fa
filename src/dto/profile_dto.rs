use crate::model::user::{Education, Experience, User};
use bson::Bson;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

const DEFAULT_HEADLINE: &str = "Egresado";
const DEFAULT_LOCATION: &str = "México";

/// Full profile as returned to clients. The password never appears here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub profile_picture: String,
    pub banner_img: String,
    pub curriculum_img: String,
    pub headline: String,
    pub location: String,
    pub about: String,
    pub skills: Vec<String>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub connections: Vec<String>,
    pub company_info: Value,
    pub student_id: Option<String>,
    pub is_first_login: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

fn text_or(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        let company_info = user
            .company_info
            .clone()
            .map(|doc| Bson::Document(doc).into_relaxed_extjson())
            .unwrap_or_else(|| Value::Object(Default::default()));

        ProfileResponse {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            profile_picture: text_or(&user.profile_picture, ""),
            banner_img: text_or(&user.banner_img, ""),
            curriculum_img: text_or(&user.curriculum_img, ""),
            headline: text_or(&user.headline, DEFAULT_HEADLINE),
            location: text_or(&user.location, DEFAULT_LOCATION),
            about: text_or(&user.about, ""),
            skills: user.skills.clone(),
            experience: user.experience.clone(),
            education: user.education.clone(),
            connections: user.connections.iter().map(|id| id.to_hex()).collect(),
            company_info,
            student_id: user.student_id.clone(),
            is_first_login: user.is_first_login,
            created_at: user.created_at.clone(),
            updated_at: user.updated_at.clone(),
        }
    }
}

/// Profile changes a user may make to themselves.
///
/// Only these fields are ever written; anything else in the body (role,
/// email, isFirstLogin, ...) is dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub username: Option<String>,
    #[validate(length(max = 200))]
    pub headline: Option<String>,
    #[validate(length(max = 5000))]
    pub about: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    pub profile_picture: Option<String>,
    pub banner_img: Option<String>,
    pub curriculum_img: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<Vec<Experience>>,
    pub education: Option<Vec<Education>>,
    pub company_info: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstLoginSetupRequest {
    pub company_info: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FirstLoginSetupResponse {
    pub message: String,
    pub user: ProfileResponse,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionQuery {
    pub limit: Option<String>,
}

impl SuggestionQuery {
    /// Unparseable, zero or negative limits fall back to `default`.
    pub fn limit_or(&self, default: i64) -> i64 {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(default)
    }
}
