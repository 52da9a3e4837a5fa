use crate::dto::UserSummaryResponse;
use crate::model::post::{Comment, Post};
use crate::model::user::UserSummary;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub content: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentRequest {
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub content: String,
    /// None when the commenter no longer exists
    pub user: Option<UserSummaryResponse>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: Option<UserSummaryResponse>,
    pub content: String,
    pub image: Option<String>,
    pub likes: Vec<String>,
    pub comments: Vec<CommentResponse>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl PostResponse {
    /// Joins a post with the users referenced by its author and comments.
    pub fn new(post: &Post, users: &HashMap<ObjectId, UserSummary>) -> Self {
        PostResponse {
            id: post.id.map(|id| id.to_hex()).unwrap_or_default(),
            author: users.get(&post.author).map(UserSummaryResponse::from),
            content: post.content.clone(),
            image: post.image.clone(),
            likes: post.likes.iter().map(|id| id.to_hex()).collect(),
            comments: post
                .comments
                .iter()
                .map(|comment| comment_response(comment, users))
                .collect(),
            created_at: post.created_at.clone(),
            updated_at: post.updated_at.clone(),
        }
    }
}

fn comment_response(comment: &Comment, users: &HashMap<ObjectId, UserSummary>) -> CommentResponse {
    CommentResponse {
        id: comment.id.map(|id| id.to_hex()),
        content: comment.content.clone(),
        user: users.get(&comment.user).map(UserSummaryResponse::from),
        created_at: comment.created_at.clone(),
    }
}

/// Every user id a joined post needs.
pub fn referenced_users<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Vec<ObjectId> {
    let mut ids: Vec<ObjectId> = Vec::new();
    for post in posts {
        ids.push(post.author);
        ids.extend(post.comments.iter().map(|c| c.user));
    }
    ids.sort();
    ids.dedup();
    ids
}
