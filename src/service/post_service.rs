use crate::dto::post_dto::{referenced_users, CreatePostRequest, PostResponse};
use crate::model::notification::NotificationType;
use crate::model::post::{Comment, Post};
use crate::model::timestamp_now;
use crate::model::user::{UserRole, UserSummary};
use crate::repository::post_repo::PostRepository;
use crate::repository::user_repo::UserRepository;
use crate::service::notification_service::NotificationService;
use crate::util::error::ServiceError;
use crate::util::media::{is_remote_url, MediaStore, MediaUpload};
use async_trait::async_trait;
use bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

const POST_NOT_FOUND: &str = "Post not found";

#[async_trait]
pub trait PostService: Send + Sync {
    /// Posts by the user and their connections, newest first.
    async fn feed(&self, user_id: &ObjectId) -> Result<Vec<PostResponse>, ServiceError>;
    async fn get_post(&self, id: &ObjectId) -> Result<PostResponse, ServiceError>;
    async fn create_post(&self, author: &ObjectId, request: CreatePostRequest) -> Result<PostResponse, ServiceError>;
    /// Allowed for the author and for administrators.
    async fn delete_post(&self, id: &ObjectId, requester: &ObjectId, role: UserRole) -> Result<(), ServiceError>;
    async fn comment(&self, id: &ObjectId, user_id: &ObjectId, content: &str) -> Result<PostResponse, ServiceError>;
    async fn toggle_like(&self, id: &ObjectId, user_id: &ObjectId) -> Result<PostResponse, ServiceError>;
}

pub struct PostServiceImpl {
    pub post_repo: Arc<dyn PostRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub notifications: Arc<dyn NotificationService>,
    pub media_store: Arc<dyn MediaStore>,
}

impl PostServiceImpl {
    pub fn new(
        post_repo: Arc<dyn PostRepository>,
        user_repo: Arc<dyn UserRepository>,
        notifications: Arc<dyn NotificationService>,
        media_store: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            post_repo,
            user_repo,
            notifications,
            media_store,
        }
    }

    async fn join(&self, posts: &[Post]) -> Result<Vec<PostResponse>, ServiceError> {
        let ids = referenced_users(posts);
        let users: HashMap<ObjectId, UserSummary> = self
            .user_repo
            .find_summaries_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        Ok(posts.iter().map(|post| PostResponse::new(post, &users)).collect())
    }

    async fn join_one(&self, post: Post) -> Result<PostResponse, ServiceError> {
        let mut joined = self.join(std::slice::from_ref(&post)).await?;
        joined
            .pop()
            .ok_or_else(|| ServiceError::InternalError("Joined post missing".to_string()))
    }

    async fn find_post(&self, id: &ObjectId) -> Result<Post, ServiceError> {
        self.post_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(POST_NOT_FOUND.to_string()))
    }

    // Failures are logged, never returned.
    async fn notify_author(&self, post: &Post, actor: &ObjectId, kind: NotificationType) {
        if let Err(e) = self.notifications.notify(&post.author, kind, actor, post.id).await {
            error!("Failed to create {:?} notification: {}", kind, e);
        }
    }
}

#[async_trait]
impl PostService for PostServiceImpl {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn feed(&self, user_id: &ObjectId) -> Result<Vec<PostResponse>, ServiceError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;
        let mut authors = user.connections.clone();
        authors.push(*user_id);

        let posts = self.post_repo.find_by_authors(&authors).await?;
        info!("Feed has {} posts", posts.len());
        self.join(&posts).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_post(&self, id: &ObjectId) -> Result<PostResponse, ServiceError> {
        let post = self.find_post(id).await?;
        self.join_one(post).await
    }

    #[instrument(skip(self, request), fields(author = %author))]
    async fn create_post(&self, author: &ObjectId, request: CreatePostRequest) -> Result<PostResponse, ServiceError> {
        let content = request.content.trim();
        if content.is_empty() {
            return Err(ServiceError::InvalidInput("Post content is required".to_string()));
        }

        let image = match request.image.filter(|image| !image.is_empty()) {
            Some(image) if is_remote_url(&image) => Some(image),
            Some(image) => {
                let upload = MediaUpload::image(&image, "posts")?;
                let url = self.media_store.store(upload).await.map_err(|e| {
                    error!("Failed to upload post image: {}", e);
                    ServiceError::from(e)
                })?;
                Some(url)
            }
            None => None,
        };

        let post = Post {
            id: None,
            author: *author,
            content: content.to_string(),
            image,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: None,
            updated_at: None,
        };
        let created = self.post_repo.create(post).await?;
        info!("Post created");
        self.join_one(created).await
    }

    #[instrument(skip(self), fields(id = %id, requester = %requester))]
    async fn delete_post(&self, id: &ObjectId, requester: &ObjectId, role: UserRole) -> Result<(), ServiceError> {
        let post = self.find_post(id).await?;

        let is_owner = post.author == *requester;
        let is_admin = role == UserRole::Administrador;
        if !is_owner && !is_admin {
            warn!("Delete refused for non-owner");
            return Err(ServiceError::Forbidden(
                "No tienes permiso para eliminar este post".to_string(),
            ));
        }

        if !self.post_repo.delete(id).await? {
            return Err(ServiceError::NotFound(POST_NOT_FOUND.to_string()));
        }
        if is_admin && !is_owner {
            info!(author = %post.author, "Post deleted by administrator");
        } else {
            info!("Post deleted by author");
        }
        Ok(())
    }

    #[instrument(skip(self, content), fields(id = %id, user_id = %user_id))]
    async fn comment(&self, id: &ObjectId, user_id: &ObjectId, content: &str) -> Result<PostResponse, ServiceError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ServiceError::InvalidInput("Comment content is required".to_string()));
        }

        let comment = Comment {
            id: Some(ObjectId::new()),
            content: content.to_string(),
            user: *user_id,
            created_at: Some(timestamp_now()),
        };
        let post = self
            .post_repo
            .push_comment(id, comment)
            .await?
            .ok_or_else(|| ServiceError::NotFound(POST_NOT_FOUND.to_string()))?;

        self.notify_author(&post, user_id, NotificationType::Comment).await;
        self.join_one(post).await
    }

    #[instrument(skip(self), fields(id = %id, user_id = %user_id))]
    async fn toggle_like(&self, id: &ObjectId, user_id: &ObjectId) -> Result<PostResponse, ServiceError> {
        let post = self.find_post(id).await?;

        let updated = if post.is_liked_by(user_id) {
            self.post_repo.remove_like(id, user_id).await?
        } else {
            let liked = self.post_repo.add_like(id, user_id).await?;
            if let Some(liked) = &liked {
                self.notify_author(liked, user_id, NotificationType::Like).await;
            }
            liked
        };

        let updated = updated.ok_or_else(|| ServiceError::NotFound(POST_NOT_FOUND.to_string()))?;
        self.join_one(updated).await
    }
}
