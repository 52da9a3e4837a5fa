use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bson::oid::ObjectId;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Invalid media payload: {0}")]
    InvalidPayload(String),

    #[error("Media upload failed: {0}")]
    UploadFailed(String),
}

/// Decoded payload ready to be written to the media store.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpload {
    pub object_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl MediaUpload {
    /// An image sent as a data URL (`data:image/png;base64,...`) or bare base64.
    pub fn image(payload: &str, folder: &str) -> Result<Self, MediaError> {
        let (content_type, data) = decode_payload(payload)?;
        let content_type = content_type.unwrap_or_else(|| "image/jpeg".to_string());
        if !content_type.starts_with("image/") {
            return Err(MediaError::InvalidPayload(format!(
                "expected an image, got {}",
                content_type
            )));
        }
        let object_name = format!(
            "{}/{}.{}",
            folder,
            uuid::Uuid::new_v4(),
            extension_for(&content_type)
        );
        Ok(MediaUpload {
            object_name,
            content_type,
            data,
        })
    }

    /// Curricula are always stored as PDF whatever the declared type.
    pub fn curriculum(payload: &str, user_id: &ObjectId, timestamp_millis: i64) -> Result<Self, MediaError> {
        let (_, data) = decode_payload(payload)?;
        Ok(MediaUpload {
            object_name: format!("curricula/curriculum_{}_{}.pdf", user_id.to_hex(), timestamp_millis),
            content_type: "application/pdf".to_string(),
            data,
        })
    }
}

/// Values that already point at stored media are kept as they are.
pub fn is_remote_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn decode_payload(payload: &str) -> Result<(Option<String>, Vec<u8>), MediaError> {
    let (content_type, encoded) = match payload.split_once(";base64,") {
        Some((header, body)) => {
            let content_type = header
                .strip_prefix("data:")
                .filter(|ct| !ct.is_empty())
                .map(str::to_string);
            (content_type, body)
        }
        None => (None, payload),
    };
    let data = STANDARD
        .decode(encoded.trim())
        .map_err(|e| MediaError::InvalidPayload(format!("base64 decode failed: {}", e)))?;
    if data.is_empty() {
        return Err(MediaError::InvalidPayload("empty payload".to_string()));
    }
    Ok((content_type, data))
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "application/pdf" => "pdf",
        _ => "bin",
    }
}

/// Durable storage for uploaded images and documents.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Stores the object and returns its public URL.
    async fn store(&self, upload: MediaUpload) -> Result<String, MediaError>;
}
