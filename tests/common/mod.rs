#![allow(dead_code)]

use alumni_network_backend::app::app::{create_router, AppDependencies, AppServices};
use alumni_network_backend::config::{AppConfig, JwtConfig};
use alumni_network_backend::model::notification::Notification;
use alumni_network_backend::model::post::{Comment, Post, PostPreview};
use alumni_network_backend::model::project::Project;
use alumni_network_backend::model::{format_timestamp, timestamp_now};
use alumni_network_backend::model::user::{User, UserRole, UserSummary};
use alumni_network_backend::repository::notification_repo::NotificationRepository;
use alumni_network_backend::repository::post_repo::PostRepository;
use alumni_network_backend::repository::project_repo::ProjectRepository;
use alumni_network_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use alumni_network_backend::repository::user_repo::{UserRepository, UsernamePattern};
use alumni_network_backend::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use alumni_network_backend::util::media::{MediaError, MediaStore, MediaUpload};
use async_trait::async_trait;
use axum::Router;
use bson::{oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use mockall::mock;
use std::sync::{Arc, Mutex};

mock! {
    pub MediaStore {}

    #[async_trait]
    impl MediaStore for MediaStore {
        async fn store(&self, upload: MediaUpload) -> Result<String, MediaError>;
    }
}

/// A media store mock that accepts any upload and links it under media.test.
pub fn accepting_media_store() -> MockMediaStore {
    let mut media = MockMediaStore::new();
    media
        .expect_store()
        .returning(|upload| Ok(format!("https://media.test/alumni-media/{}", upload.object_name)));
    media
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    pub users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn stored(&self, id: &ObjectId) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id.as_ref() == Some(id)).cloned()
    }

    pub fn remove(&self, id: &ObjectId) {
        self.users.lock().unwrap().retain(|u| u.id.as_ref() != Some(id));
    }
}

fn without_password(user: &User) -> User {
    let mut user = user.clone();
    user.password = String::new();
    user
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(user.id.unwrap_or_else(ObjectId::new));
        let now = timestamp_now();
        user.created_at = Some(now.clone());
        user.updated_at = Some(now);
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        Ok(self.stored(id).map(|u| without_password(&u)))
    }

    async fn find_by_username(&self, pattern: &UsernamePattern) -> RepositoryResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| pattern.matches(&u.username))
            .min_by(|a, b| (&a.username, a.id).cmp(&(&b.username, b.id)))
            .map(without_password))
    }

    async fn find_summaries_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<UserSummary>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| u.id.is_some_and(|id| ids.contains(&id)))
            .filter_map(UserSummary::from_user)
            .collect())
    }

    async fn update_fields(&self, id: &ObjectId, fields: Document) -> RepositoryResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(slot) = users.iter_mut().find(|u| u.id.as_ref() == Some(id)) else {
            return Ok(None);
        };
        let mut document = bson::to_document(&*slot)?;
        for (key, value) in fields {
            document.insert(key, value);
        }
        document.insert("updatedAt", timestamp_now());
        *slot = bson::from_document(document)?;
        Ok(Some(without_password(slot)))
    }

    async fn find_suggestions(
        &self,
        user_id: &ObjectId,
        exclude: &[ObjectId],
        limit: i64,
    ) -> RepositoryResult<Vec<UserSummary>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| u.id.is_some_and(|id| id != *user_id && !exclude.contains(&id)))
            .filter_map(UserSummary::from_user)
            .take(limit as usize)
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryPostRepository {
    pub posts: Mutex<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn stored(&self, id: &ObjectId) -> Option<Post> {
        self.posts.lock().unwrap().iter().find(|p| p.id.as_ref() == Some(id)).cloned()
    }

    fn update(&self, id: &ObjectId, change: impl FnOnce(&mut Post)) -> Option<Post> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts.iter_mut().find(|p| p.id.as_ref() == Some(id))?;
        change(post);
        Some(post.clone())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, mut post: Post) -> RepositoryResult<Post> {
        post.id = Some(post.id.unwrap_or_else(ObjectId::new));
        if post.created_at.is_none() {
            post.created_at = Some(timestamp_now());
        }
        post.updated_at = post.created_at.clone();
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Post>> {
        Ok(self.stored(id))
    }

    async fn find_by_authors(&self, authors: &[ObjectId]) -> RepositoryResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| authors.contains(&p.author))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_previews_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<PostPreview>> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter_map(|p| {
                let id = p.id?;
                ids.contains(&id).then(|| PostPreview {
                    id,
                    content: p.content.clone(),
                    image: p.image.clone(),
                })
            })
            .collect())
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id.as_ref() != Some(id));
        Ok(posts.len() < before)
    }

    async fn push_comment(&self, id: &ObjectId, comment: Comment) -> RepositoryResult<Option<Post>> {
        Ok(self.update(id, |post| post.comments.push(comment)))
    }

    async fn add_like(&self, id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<Option<Post>> {
        Ok(self.update(id, |post| {
            if !post.likes.contains(user_id) {
                post.likes.push(*user_id);
            }
        }))
    }

    async fn remove_like(&self, id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<Option<Post>> {
        Ok(self.update(id, |post| post.likes.retain(|liker| liker != user_id)))
    }
}

#[derive(Default)]
pub struct InMemoryNotificationRepository {
    pub notifications: Mutex<Vec<Notification>>,
    pub fail_reads: Mutex<bool>,
}

impl InMemoryNotificationRepository {
    pub fn all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn seed(&self, mut notification: Notification, created_at: &str) -> ObjectId {
        let id = ObjectId::new();
        notification.id = Some(id);
        notification.created_at = Some(created_at.to_string());
        self.notifications.lock().unwrap().push(notification);
        id
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(&self, mut notification: Notification) -> RepositoryResult<Notification> {
        notification.id = Some(ObjectId::new());
        notification.created_at = Some(timestamp_now());
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(notification)
    }

    async fn list_by_recipient(&self, recipient: &ObjectId) -> RepositoryResult<Vec<Notification>> {
        if *self.fail_reads.lock().unwrap() {
            return Err(RepositoryError::database("connection reset"));
        }
        let mut found: Vec<Notification> = self
            .all()
            .into_iter()
            .filter(|n| n.recipient == *recipient)
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn delete_many(&self, ids: &[ObjectId]) -> RepositoryResult<u64> {
        let mut notifications = self.notifications.lock().unwrap();
        let before = notifications.len();
        notifications.retain(|n| !n.id.is_some_and(|id| ids.contains(&id)));
        Ok((before - notifications.len()) as u64)
    }

    async fn mark_read(&self, id: &ObjectId, recipient: &ObjectId) -> RepositoryResult<Option<Notification>> {
        let mut notifications = self.notifications.lock().unwrap();
        Ok(notifications
            .iter_mut()
            .find(|n| n.id.as_ref() == Some(id) && n.recipient == *recipient)
            .map(|n| {
                n.read = true;
                n.clone()
            }))
    }

    async fn delete_for_recipient(&self, id: &ObjectId, recipient: &ObjectId) -> RepositoryResult<bool> {
        let mut notifications = self.notifications.lock().unwrap();
        let before = notifications.len();
        notifications.retain(|n| !(n.id.as_ref() == Some(id) && n.recipient == *recipient));
        Ok(notifications.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryProjectRepository {
    pub projects: Mutex<Vec<Project>>,
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepositoryResult<u64> {
        let now = format_timestamp(now);
        let mut projects = self.projects.lock().unwrap();
        let before = projects.len();
        projects.retain(|p| !p.is_expired_at(&now));
        Ok((before - projects.len()) as u64)
    }
}

/// Router over in-memory repositories, plus handles to inspect them.
pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub posts: Arc<InMemoryPostRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub services: AppServices,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_media(accepting_media_store())
    }

    pub fn with_media(media: MockMediaStore) -> Self {
        Self::with_config(media, AppConfig::default())
    }

    pub fn with_config(media: MockMediaStore, config: AppConfig) -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let posts = Arc::new(InMemoryPostRepository::default());
        let notifications = Arc::new(InMemoryNotificationRepository::default());
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(JwtConfig::default()));

        let deps = AppDependencies {
            user_repo: users.clone(),
            post_repo: posts.clone(),
            notification_repo: notifications.clone(),
            media_store: Arc::new(media),
            jwt_utils: jwt_utils.clone(),
        };
        let services = AppServices::new(deps, &config);
        let router = create_router(&services);

        TestApp {
            router,
            users,
            posts,
            notifications,
            jwt_utils,
            services,
        }
    }

    pub async fn add_user(&self, username: &str, role: UserRole) -> User {
        let name = format!("{} Test", username.trim());
        let user = User::new(&name, username, &format!("{}@example.mx", username.trim()), role);
        self.users.insert(user).await.unwrap()
    }

    pub async fn add_post(&self, author: &User, content: &str, created_at: &str) -> Post {
        let post = Post {
            id: None,
            author: author.id.unwrap(),
            content: content.to_string(),
            image: None,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Some(created_at.to_string()),
            updated_at: None,
        };
        self.posts.create(post).await.unwrap()
    }

    pub fn token_for(&self, user: &User) -> String {
        self.jwt_utils
            .generate_access_token(&user.id.unwrap().to_hex(), &user.email, user.role.as_str())
            .unwrap()
    }

    pub fn bearer(&self, user: &User) -> String {
        format!("Bearer {}", self.token_for(user))
    }
}
