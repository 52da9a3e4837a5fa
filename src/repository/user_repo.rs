use crate::model::timestamp_now;
use crate::model::user::{User, UserSummary};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOneOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};
use regex::{Regex, RegexBuilder};
use tracing::{error, info, instrument};

/// One stage of the public-profile username lookup.
///
/// All stages are case-insensitive and escape the input, so a username is
/// never interpreted as a regular expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernamePattern {
    Exact(String),
    TrailingWhitespace(String),
    Contains(String),
}

impl UsernamePattern {
    /// Lookup stages in precedence order.
    pub fn cascade(username: &str) -> [UsernamePattern; 3] {
        [
            UsernamePattern::Exact(username.to_string()),
            UsernamePattern::TrailingWhitespace(username.to_string()),
            UsernamePattern::Contains(username.to_string()),
        ]
    }

    pub fn regex_source(&self) -> String {
        match self {
            UsernamePattern::Exact(name) => format!("^{}$", regex::escape(name)),
            UsernamePattern::TrailingWhitespace(name) => format!(r"^{}\s*$", regex::escape(name)),
            UsernamePattern::Contains(name) => regex::escape(name),
        }
    }

    pub fn to_filter(&self) -> Document {
        doc! { "username": { "$regex": self.regex_source(), "$options": "i" } }
    }

    pub fn to_regex(&self) -> Result<Regex, regex::Error> {
        RegexBuilder::new(&self.regex_source())
            .case_insensitive(true)
            .build()
    }

    pub fn matches(&self, username: &str) -> bool {
        self.to_regex()
            .map(|re| re.is_match(username))
            .unwrap_or(false)
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>>;
    /// First match ordered by username, then id.
    async fn find_by_username(&self, pattern: &UsernamePattern) -> RepositoryResult<Option<User>>;
    async fn find_summaries_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<UserSummary>>;
    /// Applies `$set` and returns the updated user, or None when the id is unknown.
    async fn update_fields(&self, id: &ObjectId, fields: Document) -> RepositoryResult<Option<User>>;
    async fn find_suggestions(
        &self,
        user_id: &ObjectId,
        exclude: &[ObjectId],
        limit: i64,
    ) -> RepositoryResult<Vec<UserSummary>>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        MongoUserRepository {
            collection: db.collection::<User>("users"),
        }
    }

    fn summary_projection() -> Document {
        doc! { "name": 1, "username": 1, "profilePicture": 1, "headline": 1 }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(ObjectId::new());
        let now = timestamp_now();
        user.created_at = Some(now.clone());
        user.updated_at = Some(now);
        self.collection.insert_one(user.clone(), None).await.map_err(|e| {
            error!("Failed to insert user: {}", e);
            RepositoryError::from(e)
        })?;
        info!("User inserted");
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        let options = FindOneOptions::builder()
            .projection(doc! { "password": 0 })
            .build();
        let user = self
            .collection
            .find_one(doc! { "_id": id }, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by id: {}", e)))?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, pattern: &UsernamePattern) -> RepositoryResult<Option<User>> {
        let options = FindOneOptions::builder()
            .projection(doc! { "password": 0 })
            .sort(doc! { "username": 1, "_id": 1 })
            .build();
        let user = self
            .collection
            .find_one(pattern.to_filter(), options)
            .await
            .map_err(|e| {
                error!("Failed to find user by username: {}", e);
                RepositoryError::database(format!("Failed to find user by username: {}", e))
            })?;
        Ok(user)
    }

    async fn find_summaries_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<UserSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let options = FindOptions::builder()
            .projection(Self::summary_projection())
            .build();
        let cursor = self
            .collection
            .clone_with_type::<UserSummary>()
            .find(doc! { "_id": { "$in": ids.to_vec() } }, options)
            .await?;
        let summaries: Vec<UserSummary> = cursor.try_collect().await?;
        Ok(summaries)
    }

    #[instrument(skip(self, fields), fields(id = %id))]
    async fn update_fields(&self, id: &ObjectId, mut fields: Document) -> RepositoryResult<Option<User>> {
        fields.insert("updatedAt", timestamp_now());
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .projection(doc! { "password": 0 })
            .build();
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields }, options)
            .await
            .map_err(|e| {
                error!("Failed to update user: {}", e);
                RepositoryError::database(format!("Failed to update user: {}", e))
            })?;
        Ok(updated)
    }

    async fn find_suggestions(
        &self,
        user_id: &ObjectId,
        exclude: &[ObjectId],
        limit: i64,
    ) -> RepositoryResult<Vec<UserSummary>> {
        let filter = doc! { "_id": { "$ne": user_id, "$nin": exclude.to_vec() } };
        let options = FindOptions::builder()
            .projection(Self::summary_projection())
            .limit(limit)
            .build();
        let cursor = self
            .collection
            .clone_with_type::<UserSummary>()
            .find(filter, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }
}
