use crate::dto::UserSummaryResponse;
use crate::model::notification::{Notification, NotificationType};
use crate::model::post::PostPreview;
use crate::model::user::UserSummary;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPreviewResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub image: Option<String>,
}

impl From<&PostPreview> for PostPreviewResponse {
    fn from(preview: &PostPreview) -> Self {
        PostPreviewResponse {
            id: preview.id.to_hex(),
            content: preview.content.clone(),
            image: preview.image.clone(),
        }
    }
}

/// A notification with its actor and post resolved.
///
/// `related_user` is mandatory: notifications whose actor cannot be
/// resolved are never turned into a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub recipient: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub related_user: UserSummaryResponse,
    pub related_post: Option<PostPreviewResponse>,
    pub read: bool,
    pub created_at: Option<String>,
}

impl NotificationResponse {
    pub fn new(
        notification: &Notification,
        related_user: &UserSummary,
        related_post: Option<&PostPreview>,
    ) -> Self {
        NotificationResponse {
            id: notification.id.map(|id| id.to_hex()).unwrap_or_default(),
            recipient: notification.recipient.to_hex(),
            notification_type: notification.notification_type,
            related_user: related_user.into(),
            related_post: related_post.map(PostPreviewResponse::from),
            read: notification.read,
            created_at: notification.created_at.clone(),
        }
    }
}

/// A stored notification with references left as ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub recipient: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub related_user: Option<String>,
    pub related_post: Option<String>,
    pub read: bool,
    pub created_at: Option<String>,
}

impl From<&Notification> for NotificationRecord {
    fn from(notification: &Notification) -> Self {
        NotificationRecord {
            id: notification.id.map(|id| id.to_hex()).unwrap_or_default(),
            recipient: notification.recipient.to_hex(),
            notification_type: notification.notification_type,
            related_user: notification.related_user.map(|id| id.to_hex()),
            related_post: notification.related_post.map(|id| id.to_hex()),
            read: notification.read,
            created_at: notification.created_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn test_response_shape() {
        let actor = UserSummary {
            id: ObjectId::new(),
            name: "Ana".to_string(),
            username: "ana".to_string(),
            profile_picture: String::new(),
            headline: String::new(),
        };
        let mut notification =
            Notification::new(ObjectId::new(), NotificationType::ConnectionAccepted, actor.id, None);
        notification.id = Some(ObjectId::new());

        let body = serde_json::to_value(NotificationResponse::new(&notification, &actor, None)).unwrap();
        assert_eq!(body["type"], "connectionAccepted");
        assert_eq!(body["relatedUser"]["username"], "ana");
        assert_eq!(body["relatedUser"]["_id"], actor.id.to_hex());
        assert!(body["relatedPost"].is_null());
        assert_eq!(body["read"], false);
    }
}
