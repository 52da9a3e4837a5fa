use crate::model::notification::Notification;
use crate::model::timestamp_now;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};
use tracing::{error, info, instrument};

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: Notification) -> RepositoryResult<Notification>;
    /// Newest first.
    async fn list_by_recipient(&self, recipient: &ObjectId) -> RepositoryResult<Vec<Notification>>;
    async fn delete_many(&self, ids: &[ObjectId]) -> RepositoryResult<u64>;
    /// Both operations only match when `recipient` owns the notification.
    async fn mark_read(&self, id: &ObjectId, recipient: &ObjectId) -> RepositoryResult<Option<Notification>>;
    async fn delete_for_recipient(&self, id: &ObjectId, recipient: &ObjectId) -> RepositoryResult<bool>;
}

pub struct MongoNotificationRepository {
    collection: Collection<Notification>,
}

impl MongoNotificationRepository {
    pub fn new(db: &Database) -> Self {
        MongoNotificationRepository {
            collection: db.collection::<Notification>("notifications"),
        }
    }
}

#[async_trait]
impl NotificationRepository for MongoNotificationRepository {
    #[instrument(skip(self, notification), fields(recipient = %notification.recipient))]
    async fn create(&self, mut notification: Notification) -> RepositoryResult<Notification> {
        notification.id = Some(ObjectId::new());
        notification.created_at = Some(timestamp_now());
        match self.collection.insert_one(notification.clone(), None).await {
            Ok(_) => {
                info!("Notification created");
                Ok(notification)
            }
            Err(e) => {
                error!("Failed to create notification: {}", e);
                Err(RepositoryError::database(format!("Failed to create notification: {}", e)))
            }
        }
    }

    #[instrument(skip(self), fields(recipient = %recipient))]
    async fn list_by_recipient(&self, recipient: &ObjectId) -> RepositoryResult<Vec<Notification>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        let mut cursor = self
            .collection
            .find(doc! { "recipient": recipient }, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list notifications: {}", e)))?;
        let mut notifications = Vec::new();
        while let Some(notification) = cursor.next().await {
            match notification {
                Ok(n) => notifications.push(n),
                Err(e) => {
                    error!("Failed to deserialize notification: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize notification: {}",
                        e
                    )));
                }
            }
        }
        Ok(notifications)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn delete_many(&self, ids: &[ObjectId]) -> RepositoryResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .collection
            .delete_many(doc! { "_id": { "$in": ids.to_vec() } }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to delete notifications: {}", e)))?;
        info!("Deleted {} notifications", result.deleted_count);
        Ok(result.deleted_count)
    }

    #[instrument(skip(self), fields(id = %id, recipient = %recipient))]
    async fn mark_read(&self, id: &ObjectId, recipient: &ObjectId) -> RepositoryResult<Option<Notification>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "recipient": recipient },
                doc! { "$set": { "read": true } },
                options,
            )
            .await
            .map_err(|e| {
                error!("Failed to mark notification as read: {}", e);
                RepositoryError::database(format!("Failed to mark notification as read: {}", e))
            })?;
        Ok(updated)
    }

    #[instrument(skip(self), fields(id = %id, recipient = %recipient))]
    async fn delete_for_recipient(&self, id: &ObjectId, recipient: &ObjectId) -> RepositoryResult<bool> {
        let deleted = self
            .collection
            .find_one_and_delete(doc! { "_id": id, "recipient": recipient }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to delete notification: {}", e)))?;
        Ok(deleted.is_some())
    }
}
