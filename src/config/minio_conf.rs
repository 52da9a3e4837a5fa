use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// Object storage settings for uploaded images and documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinioConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket_name: String,
    /// Public base URL that download links are built from
    pub links_prefix: String,
    pub region: Option<String>,
    pub secure: bool,
}

impl MinioConfig {
    /// Load MinIO configuration from environment variables
    ///
    /// - MINIO_ENDPOINT, MINIO_ACCESS_KEY, MINIO_SECRET_KEY, MINIO_BUCKET_NAME (required)
    /// - MINIO_LINKS_PREFIX: defaults to the endpoint URL
    /// - MINIO_REGION: defaults to "us-east-1"
    /// - MINIO_SECURE: defaults to false
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MinIO configuration from environment variables");

        let required = |key: &str| {
            env::var(key).map_err(|_| {
                error!("{} environment variable not found", key);
                ConfigError::EnvVarNotFound(key.to_string())
            })
        };

        let endpoint = required("MINIO_ENDPOINT")?;
        let access_key = required("MINIO_ACCESS_KEY")?;
        let secret_key = required("MINIO_SECRET_KEY")?;
        let bucket_name = required("MINIO_BUCKET_NAME")?;
        debug!("MinIO endpoint: {}, bucket: {}", endpoint, bucket_name);

        let region = Some(env::var("MINIO_REGION").unwrap_or_else(|_| {
            warn!("MINIO_REGION not set, using default: us-east-1");
            "us-east-1".to_string()
        }));

        let secure = match env::var("MINIO_SECURE") {
            Ok(v) => v.parse::<bool>().map_err(|_| {
                ConfigError::InvalidValue("Invalid MINIO_SECURE value".to_string())
            })?,
            Err(_) => false,
        };

        let mut config = Self {
            endpoint,
            access_key,
            secret_key,
            bucket_name,
            links_prefix: String::new(),
            region,
            secure,
        };
        config.links_prefix =
            env::var("MINIO_LINKS_PREFIX").unwrap_or_else(|_| config.get_endpoint_url());

        config.validate()?;
        info!("MinIO configuration loaded successfully");
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::ValidationError("Endpoint cannot be empty".to_string()));
        }

        if self.access_key.is_empty() || self.secret_key.is_empty() {
            return Err(ConfigError::ValidationError(
                "Access key and secret key cannot be empty".to_string(),
            ));
        }

        if !self
            .bucket_name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
        {
            error!("Invalid bucket name format: {}", self.bucket_name);
            return Err(ConfigError::ValidationError(
                "Bucket name contains invalid characters".to_string(),
            ));
        }

        if self.bucket_name.len() < 3 || self.bucket_name.len() > 63 {
            return Err(ConfigError::ValidationError(
                "Bucket name must be between 3 and 63 characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the full endpoint URL with protocol
    pub fn get_endpoint_url(&self) -> String {
        let protocol = if self.secure { "https" } else { "http" };
        format!("{}://{}", protocol, self.endpoint)
    }
}

impl Default for MinioConfig {
    fn default() -> Self {
        Self {
            endpoint: "localhost:9000".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            bucket_name: "alumni-media".to_string(),
            links_prefix: "http://localhost:9000".to_string(),
            region: Some("us-east-1".to_string()),
            secure: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        assert!(MinioConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_uppercase_bucket_name() {
        let mut config = MinioConfig::default();
        config.bucket_name = "Alumni".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_short_bucket_name() {
        let mut config = MinioConfig::default();
        config.bucket_name = "ab".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_get_endpoint_url() {
        let mut config = MinioConfig::default();
        assert_eq!(config.get_endpoint_url(), "http://localhost:9000");
        config.secure = true;
        assert_eq!(config.get_endpoint_url(), "https://localhost:9000");
    }
}
