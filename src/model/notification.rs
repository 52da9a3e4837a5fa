use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationType {
    Like,
    Comment,
    ConnectionAccepted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub recipient: ObjectId,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// None once the actor has been removed; such notifications are orphans
    pub related_user: Option<ObjectId>,
    pub related_post: Option<ObjectId>,
    #[serde(default)]
    pub read: bool,
    pub created_at: Option<String>,
}

impl Notification {
    pub fn new(
        recipient: ObjectId,
        notification_type: NotificationType,
        related_user: ObjectId,
        related_post: Option<ObjectId>,
    ) -> Self {
        Notification {
            id: None,
            recipient,
            notification_type,
            related_user: Some(related_user),
            related_post,
            read: false,
            created_at: None,
        }
    }
}
