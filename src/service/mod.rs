pub mod cleanup_service;
pub mod notification_service;
pub mod post_service;
pub mod user_service;
