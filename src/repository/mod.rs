pub mod mongo;
pub mod notification_repo;
pub mod post_repo;
pub mod project_repo;
pub mod repository_error;
pub mod user_repo;
