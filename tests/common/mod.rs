//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

/// Test helper functions
pub mod helpers {
    use std::io::Write;

    use tempfile::NamedTempFile;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    use wiremock::MockServer;

    use tiktok_video_uploader::{Settings, UploadOrchestrator};

    /// Install a test logging subscriber; later calls are no-ops
    pub fn init_tracing() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init()
            .ok();
    }

    /// Create settings pointed at a mock server
    pub fn settings_for(server: &MockServer) -> Settings {
        init_tracing();
        let mut settings = Settings::default();
        settings.api.base_url = server.uri();
        settings
    }

    /// Create an orchestrator pointed at a mock server
    pub fn orchestrator_for(server: &MockServer) -> UploadOrchestrator {
        UploadOrchestrator::new(settings_for(server))
    }

    /// Write a scratch video file of exactly `len` bytes
    pub fn write_video(len: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        // Repeating pattern so partially-written files would be noticed
        let block: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
        let mut remaining = len;
        while remaining > 0 {
            let take = remaining.min(block.len());
            file.write_all(&block[..take]).unwrap();
            remaining -= take;
        }
        file.flush().unwrap();
        file
    }

    /// JSON body of a successful initiation response
    pub fn ok_init_body(server: &MockServer, publish_id: &str) -> serde_json::Value {
        serde_json::json!({
            "data": {
                "publish_id": publish_id,
                "upload_url": format!("{}/upload/session", server.uri())
            },
            "error": {"code": "ok", "message": "", "log_id": "202401010000000001"}
        })
    }

    /// JSON body of a failed initiation response
    pub fn error_init_body(code: &str, message: &str) -> serde_json::Value {
        serde_json::json!({
            "error": {"code": code, "message": message}
        })
    }
}
