//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the upload client.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration settings for the upload client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Remote API configuration
    pub api: ApiSettings,
    /// HTTP timeout configuration
    pub http: HttpSettings,
}

/// Remote API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the Content Posting API
    pub base_url: String,
}

/// HTTP timeout configuration
///
/// Session-initiation and token exchanges use the short init timeout; chunk
/// bodies get a long timeout scaled to the chunk size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Timeout for init/token requests, in seconds
    pub init_timeout_secs: u64,
    /// Base timeout for a chunk PUT, in seconds
    pub chunk_timeout_base_secs: u64,
    /// Additional timeout per MiB of chunk body, in seconds
    pub chunk_timeout_secs_per_mib: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: "https://open.tiktokapis.com".to_string(),
            },
            http: HttpSettings {
                init_timeout_secs: 30,
                chunk_timeout_base_secs: 60,
                chunk_timeout_secs_per_mib: 6,
            },
        }
    }
}

impl ApiSettings {
    /// Init endpoint for inbox-delivery uploads
    pub fn inbox_init_url(&self) -> String {
        format!(
            "{}/v2/post/publish/inbox/video/init/",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Init endpoint for direct-post uploads
    pub fn direct_post_init_url(&self) -> String {
        format!(
            "{}/v2/post/publish/video/init/",
            self.base_url.trim_end_matches('/')
        )
    }

    /// OAuth token endpoint (refresh-token grant)
    pub fn token_url(&self) -> String {
        format!("{}/v2/oauth/token/", self.base_url.trim_end_matches('/'))
    }
}

impl HttpSettings {
    /// Timeout for session-initiation and token-endpoint requests
    pub fn init_timeout(&self) -> Duration {
        Duration::from_secs(self.init_timeout_secs)
    }

    /// Timeout for one chunk PUT, scaled to the body size
    pub fn chunk_timeout(&self, chunk_len: u64) -> Duration {
        let mib = chunk_len.div_ceil(1024 * 1024);
        Duration::from_secs(self.chunk_timeout_base_secs + mib * self.chunk_timeout_secs_per_mib)
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::config(format!("Cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| crate::Error::config(format!("Cannot parse {}: {}", path.display(), e)))
    }

    /// Load settings from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Override settings with environment variables where present
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        if let Ok(base_url) = std::env::var("TIKTOK_API_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("TIKTOK_INIT_TIMEOUT_SECS") {
            self.http.init_timeout_secs = timeout
                .parse()
                .map_err(|e| crate::Error::config(format!("Invalid init timeout: {}", e)))?;
        }

        if let Ok(timeout) = std::env::var("TIKTOK_CHUNK_TIMEOUT_BASE_SECS") {
            self.http.chunk_timeout_base_secs = timeout
                .parse()
                .map_err(|e| crate::Error::config(format!("Invalid chunk timeout: {}", e)))?;
        }

        if let Ok(timeout) = std::env::var("TIKTOK_CHUNK_TIMEOUT_SECS_PER_MIB") {
            self.http.chunk_timeout_secs_per_mib = timeout
                .parse()
                .map_err(|e| crate::Error::config(format!("Invalid per-MiB timeout: {}", e)))?;
        }

        Ok(self)
    }

    /// Validate the final configuration
    pub fn validate(&self) -> crate::Result<()> {
        let url = url::Url::parse(&self.api.base_url)
            .map_err(|e| crate::Error::config(format!("Invalid base URL: {}", e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(crate::Error::config(format!(
                "Unsupported base URL scheme: {}",
                url.scheme()
            )));
        }

        if self.http.init_timeout_secs == 0 || self.http.chunk_timeout_base_secs == 0 {
            return Err(crate::Error::config("Timeouts must be positive"));
        }

        Ok(())
    }

    /// Default per-user configuration file location
    pub fn default_config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tiktok-video-uploader").join("config.toml"))
    }
}
