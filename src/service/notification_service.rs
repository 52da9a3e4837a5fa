use crate::dto::notification_dto::{NotificationRecord, NotificationResponse};
use crate::model::notification::{Notification, NotificationType};
use crate::model::post::PostPreview;
use crate::model::user::UserSummary;
use crate::repository::notification_repo::NotificationRepository;
use crate::repository::post_repo::PostRepository;
use crate::repository::user_repo::UserRepository;
use crate::util::error::ServiceError;
use async_trait::async_trait;
use bson::oid::ObjectId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

const NOT_FOUND: &str = "Notification not found";

#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Newest first. Notifications whose actor no longer exists are deleted
    /// and left out of the result.
    async fn list_for_user(&self, recipient: &ObjectId) -> Result<Vec<NotificationResponse>, ServiceError>;
    async fn mark_as_read(&self, id: &ObjectId, recipient: &ObjectId) -> Result<NotificationRecord, ServiceError>;
    async fn delete(&self, id: &ObjectId, recipient: &ObjectId) -> Result<(), ServiceError>;
    /// Returns None when the actor is the recipient.
    async fn notify(
        &self,
        recipient: &ObjectId,
        notification_type: NotificationType,
        actor: &ObjectId,
        post: Option<ObjectId>,
    ) -> Result<Option<Notification>, ServiceError>;
}

pub struct NotificationServiceImpl {
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub post_repo: Arc<dyn PostRepository>,
}

impl NotificationServiceImpl {
    pub fn new(
        notification_repo: Arc<dyn NotificationRepository>,
        user_repo: Arc<dyn UserRepository>,
        post_repo: Arc<dyn PostRepository>,
    ) -> Self {
        Self {
            notification_repo,
            user_repo,
            post_repo,
        }
    }
}

#[async_trait]
impl NotificationService for NotificationServiceImpl {
    #[instrument(skip(self), fields(recipient = %recipient))]
    async fn list_for_user(&self, recipient: &ObjectId) -> Result<Vec<NotificationResponse>, ServiceError> {
        let notifications = self.notification_repo.list_by_recipient(recipient).await?;

        let mut user_ids: Vec<ObjectId> = notifications.iter().filter_map(|n| n.related_user).collect();
        user_ids.sort();
        user_ids.dedup();
        let mut post_ids: Vec<ObjectId> = notifications.iter().filter_map(|n| n.related_post).collect();
        post_ids.sort();
        post_ids.dedup();

        let users: HashMap<ObjectId, UserSummary> = self
            .user_repo
            .find_summaries_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let posts: HashMap<ObjectId, PostPreview> = self
            .post_repo
            .find_previews_by_ids(&post_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut valid = Vec::with_capacity(notifications.len());
        let mut orphans = Vec::new();
        for notification in &notifications {
            match notification.related_user.and_then(|id| users.get(&id)) {
                Some(actor) => {
                    let post = notification.related_post.and_then(|id| posts.get(&id));
                    valid.push(NotificationResponse::new(notification, actor, post));
                }
                None => orphans.extend(notification.id),
            }
        }

        if !orphans.is_empty() {
            warn!("Found {} orphan notifications, cleaning up", orphans.len());
            let deleted = self.notification_repo.delete_many(&orphans).await.map_err(|e| {
                error!("Failed to delete orphan notifications: {}", e);
                ServiceError::from(e)
            })?;
            debug!("Deleted {} orphan notifications", deleted);
        }

        info!("Returning {} notifications", valid.len());
        Ok(valid)
    }

    #[instrument(skip(self), fields(id = %id, recipient = %recipient))]
    async fn mark_as_read(&self, id: &ObjectId, recipient: &ObjectId) -> Result<NotificationRecord, ServiceError> {
        let notification = self
            .notification_repo
            .mark_read(id, recipient)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))?;
        Ok(NotificationRecord::from(&notification))
    }

    #[instrument(skip(self), fields(id = %id, recipient = %recipient))]
    async fn delete(&self, id: &ObjectId, recipient: &ObjectId) -> Result<(), ServiceError> {
        if !self.notification_repo.delete_for_recipient(id, recipient).await? {
            return Err(ServiceError::NotFound(NOT_FOUND.to_string()));
        }
        info!("Notification deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn notify(
        &self,
        recipient: &ObjectId,
        notification_type: NotificationType,
        actor: &ObjectId,
        post: Option<ObjectId>,
    ) -> Result<Option<Notification>, ServiceError> {
        if recipient == actor {
            return Ok(None);
        }
        let notification = Notification::new(*recipient, notification_type, *actor, post);
        let created = self.notification_repo.create(notification).await?;
        Ok(Some(created))
    }
}
