use crate::model::format_timestamp;
use crate::model::project::Project;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use mongodb::{Collection, Database};
use tracing::{error, instrument};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Deletes every project whose `expiresAt` is before `now`.
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepositoryResult<u64>;
}

/// `expiresAt` may be stored as a BSON date or as an RFC 3339 string.
/// Mongo only compares values of the same type, so both are matched.
pub fn expired_filter(now: DateTime<Utc>) -> Document {
    doc! {
        "$or": [
            { "expiresAt": { "$lt": bson::DateTime::from_chrono(now) } },
            { "expiresAt": { "$lt": format_timestamp(now) } },
        ]
    }
}

pub struct MongoProjectRepository {
    collection: Collection<Project>,
}

impl MongoProjectRepository {
    pub fn new(db: &Database) -> Self {
        MongoProjectRepository {
            collection: db.collection::<Project>("projects"),
        }
    }
}

#[async_trait]
impl ProjectRepository for MongoProjectRepository {
    #[instrument(skip(self))]
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepositoryResult<u64> {
        let result = self
            .collection
            .delete_many(expired_filter(now), None)
            .await
            .map_err(|e| {
                error!("Failed to delete expired projects: {}", e);
                RepositoryError::database(format!("Failed to delete expired projects: {}", e))
            })?;
        Ok(result.deleted_count)
    }
}
