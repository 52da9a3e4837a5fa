pub mod notification_dto;
pub mod post_dto;
pub mod profile_dto;

use crate::model::user::UserSummary;
use serde::Serialize;

/// Public slice of a user as embedded in API responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub username: String,
    pub profile_picture: String,
    pub headline: String,
}

impl From<&UserSummary> for UserSummaryResponse {
    fn from(summary: &UserSummary) -> Self {
        UserSummaryResponse {
            id: summary.id.to_hex(),
            name: summary.name.clone(),
            username: summary.username.clone(),
            profile_picture: summary.profile_picture.clone(),
            headline: summary.headline.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
