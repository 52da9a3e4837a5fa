use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub owner: Option<ObjectId>,
    /// Projects without an expiry never expire. Written by this crate as an
    /// RFC 3339 string; cleanup also matches BSON dates.
    pub expires_at: Option<String>,
    pub created_at: Option<String>,
}

impl Project {
    pub fn is_expired_at(&self, now: &str) -> bool {
        matches!(&self.expires_at, Some(expiry) if expiry.as_str() < now)
    }
}
