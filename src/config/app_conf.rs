use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ConfigError;

const DEFAULT_MAX_BODY_MB: usize = 50;

/// HTTP server and runtime settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// "production" enables the cleanup job by default.
    pub environment: String,
    /// Built SPA served for non-API paths, if present.
    pub frontend_dist: Option<PathBuf>,
    pub auth_cookie_name: String,
    pub cleanup_enabled: bool,
    pub cleanup_interval_hours: u64,
    /// Request body cap. Media arrives base64-encoded inside JSON bodies.
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Load application configuration from environment variables
    ///
    /// - APP_HOST (defaults to 127.0.0.1)
    /// - APP_PORT (defaults to 5000)
    /// - APP_ENV (defaults to "development")
    /// - FRONTEND_DIST (optional)
    /// - AUTH_COOKIE_NAME (defaults to "jwt-linkedin")
    /// - CLEANUP_ENABLED (defaults to true in production, false otherwise)
    /// - CLEANUP_INTERVAL_HOURS (defaults to 24)
    /// - MAX_BODY_SIZE_MB (defaults to 50)
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("Invalid APP_PORT value".to_string()))?;

        let environment = env::var("APP_ENV").unwrap_or_else(|_| {
            warn!("APP_ENV not set, using default: development");
            "development".to_string()
        });

        let frontend_dist = env::var("FRONTEND_DIST").ok().map(PathBuf::from);
        let auth_cookie_name =
            env::var("AUTH_COOKIE_NAME").unwrap_or_else(|_| "jwt-linkedin".to_string());

        let cleanup_enabled = match env::var("CLEANUP_ENABLED") {
            Ok(v) => v
                .parse::<bool>()
                .map_err(|_| ConfigError::InvalidValue("Invalid CLEANUP_ENABLED value".to_string()))?,
            Err(_) => environment == "production",
        };

        let cleanup_interval_hours = env::var("CLEANUP_INTERVAL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("Invalid CLEANUP_INTERVAL_HOURS value".to_string())
            })?;

        let max_body_mb = env::var("MAX_BODY_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_BODY_MB.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue("Invalid MAX_BODY_SIZE_MB value".to_string()))?;

        let config = AppConfig {
            host,
            port,
            environment,
            frontend_dist,
            auth_cookie_name,
            cleanup_enabled,
            cleanup_interval_hours,
            max_body_bytes: max_body_mb.saturating_mul(1024 * 1024),
        };
        debug!(?config, "Application configuration loaded");
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::ValidationError("APP_HOST cannot be empty".to_string()));
        }
        if self.cleanup_interval_hours == 0 {
            return Err(ConfigError::ValidationError(
                "CLEANUP_INTERVAL_HOURS must be greater than 0".to_string(),
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_BODY_SIZE_MB must be greater than 0".to_string(),
            ));
        }
        if self.auth_cookie_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "AUTH_COOKIE_NAME cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Time between cleanup passes. Saturates for absurdly large hour counts.
    pub fn cleanup_period(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_hours.saturating_mul(60 * 60))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            environment: "development".to_string(),
            frontend_dist: None,
            auth_cookie_name: "jwt-linkedin".to_string(),
            cleanup_enabled: false,
            cleanup_interval_hours: 24,
            max_body_bytes: DEFAULT_MAX_BODY_MB * 1024 * 1024,
        }
    }
}
