pub mod notification_router;
pub mod post_router;
pub mod user_router;
