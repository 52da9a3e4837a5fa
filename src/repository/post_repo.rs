use crate::model::post::{Comment, Post, PostPreview};
use crate::model::timestamp_now;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};
use tracing::{error, info, instrument};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> RepositoryResult<Post>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Post>>;
    /// Newest first.
    async fn find_by_authors(&self, authors: &[ObjectId]) -> RepositoryResult<Vec<Post>>;
    async fn find_previews_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<PostPreview>>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool>;
    async fn push_comment(&self, id: &ObjectId, comment: Comment) -> RepositoryResult<Option<Post>>;
    async fn add_like(&self, id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<Option<Post>>;
    async fn remove_like(&self, id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<Option<Post>>;
}

pub struct MongoPostRepository {
    collection: Collection<Post>,
}

impl MongoPostRepository {
    pub fn new(db: &Database) -> Self {
        MongoPostRepository {
            collection: db.collection::<Post>("posts"),
        }
    }

    async fn update_and_fetch(&self, id: &ObjectId, update: Document) -> RepositoryResult<Option<Post>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.collection
            .find_one_and_update(doc! { "_id": id }, update, options)
            .await
            .map_err(|e| {
                error!("Failed to update post {}: {}", id, e);
                RepositoryError::database(format!("Failed to update post: {}", e))
            })
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    #[instrument(skip(self, post), fields(author = %post.author))]
    async fn create(&self, mut post: Post) -> RepositoryResult<Post> {
        post.id = Some(ObjectId::new());
        let now = timestamp_now();
        post.created_at = Some(now.clone());
        post.updated_at = Some(now);
        self.collection.insert_one(post.clone(), None).await.map_err(|e| {
            error!("Failed to create post: {}", e);
            RepositoryError::database(format!("Failed to create post: {}", e))
        })?;
        info!("Post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Post>> {
        let post = self
            .collection
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to fetch post by ID: {}", e)))?;
        Ok(post)
    }

    #[instrument(skip(self, authors), fields(authors = authors.len()))]
    async fn find_by_authors(&self, authors: &[ObjectId]) -> RepositoryResult<Vec<Post>> {
        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        let cursor = self
            .collection
            .find(doc! { "author": { "$in": authors.to_vec() } }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_previews_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<PostPreview>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let options = FindOptions::builder()
            .projection(doc! { "content": 1, "image": 1 })
            .build();
        let cursor = self
            .collection
            .clone_with_type::<PostPreview>()
            .find(doc! { "_id": { "$in": ids.to_vec() } }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to delete post: {}", e)))?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self, comment), fields(id = %id))]
    async fn push_comment(&self, id: &ObjectId, comment: Comment) -> RepositoryResult<Option<Post>> {
        let comment = bson::to_bson(&comment)?;
        self.update_and_fetch(
            id,
            doc! { "$push": { "comments": comment }, "$set": { "updatedAt": timestamp_now() } },
        )
        .await
    }

    async fn add_like(&self, id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<Option<Post>> {
        self.update_and_fetch(id, doc! { "$addToSet": { "likes": user_id } })
            .await
    }

    async fn remove_like(&self, id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<Option<Post>> {
        self.update_and_fetch(id, doc! { "$pull": { "likes": user_id } })
            .await
    }
}
