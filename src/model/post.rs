use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub content: String,
    pub user: ObjectId,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub author: ObjectId,
    #[serde(default)]
    pub content: String,
    pub image: Option<String>,
    #[serde(default)]
    pub likes: Vec<ObjectId>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Post {
    pub fn is_liked_by(&self, user_id: &ObjectId) -> bool {
        self.likes.contains(user_id)
    }
}

/// Projection of a post embedded in notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPreview {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub content: String,
    pub image: Option<String>,
}
