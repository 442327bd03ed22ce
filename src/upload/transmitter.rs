//! Chunk transmission
//!
//! Sends one contiguous byte range to the session's destination URL and
//! validates the server's acknowledgement.

use reqwest::{Client, StatusCode, header};
use tracing::debug;

use crate::{Error, Result, config::Settings, types::InitResponse};

/// Maximum length of a server body quoted in an error message
const ERROR_BODY_SNIPPET_LEN: usize = 500;

/// Client for the session-scoped upload URL
#[derive(Debug, Clone)]
pub struct ChunkTransmitter {
    /// Shared HTTP client
    client: Client,
    /// Timeout configuration
    settings: Settings,
}

impl ChunkTransmitter {
    /// Create a new transmitter
    pub fn new(client: Client, settings: Settings) -> Self {
        Self { client, settings }
    }

    /// PUT one byte range and return the new acknowledged-bytes total.
    ///
    /// HTTP 206 means the range was accepted and more is expected; HTTP 201
    /// means the upload is complete. The server's echoed `Content-Range`
    /// upper bound is authoritative for progress; when absent the fallback is
    /// `range_end + 1`, which never claims more than this call sent. Any
    /// other status classifies via the error envelope in the body, or as a
    /// plain rejection carrying the HTTP status and a body snippet.
    pub async fn send(
        &self,
        upload_url: &str,
        bytes: Vec<u8>,
        range_start: u64,
        range_end: u64,
        total_size: u64,
    ) -> Result<u64> {
        let content_range = format!("bytes {}-{}/{}", range_start, range_end, total_size);
        let timeout = self.settings.http.chunk_timeout(bytes.len() as u64);
        debug!(
            "PUT {} bytes to {} ({})",
            bytes.len(),
            upload_url,
            content_range
        );

        let response = self
            .client
            .put(upload_url)
            .header(header::CONTENT_TYPE, "video/mp4")
            .header(header::CONTENT_RANGE, &content_range)
            .timeout(timeout)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::PARTIAL_CONTENT || status == StatusCode::CREATED {
            let acknowledged = response
                .headers()
                .get(header::CONTENT_RANGE)
                .and_then(|value| value.to_str().ok())
                .and_then(parse_acknowledged_bytes);

            return Ok(acknowledged.unwrap_or(range_end + 1));
        }

        let body = response.text().await?;
        Err(classify_rejection(status, &body))
    }
}

/// Parse the acknowledged-bytes total out of an echoed `Content-Range`
/// header of the form `bytes {first}-{last}/{total}`.
fn parse_acknowledged_bytes(value: &str) -> Option<u64> {
    let rest = value.strip_prefix("bytes ")?;
    let (range, _total) = rest.split_once('/')?;
    let (_first, last) = range.split_once('-')?;
    last.trim().parse::<u64>().ok().map(|last| last + 1)
}

/// Classify a non-success chunk response
fn classify_rejection(status: StatusCode, body: &str) -> Error {
    if let Ok(envelope) = serde_json::from_str::<InitResponse>(body)
        && let Some(error) = envelope.error
        && error.code != "ok"
    {
        return Error::from_api_code(error.code, error.message);
    }

    let snippet: String = body.chars().take(ERROR_BODY_SNIPPET_LEN).collect();
    Error::server_rejected(format!("http_{}", status.as_u16()), snippet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header as header_matcher, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transmitter() -> ChunkTransmitter {
        ChunkTransmitter::new(Client::new(), Settings::default())
    }

    #[test]
    fn test_parse_acknowledged_bytes() {
        assert_eq!(
            parse_acknowledged_bytes("bytes 0-10485759/26214400"),
            Some(10485760)
        );
        assert_eq!(parse_acknowledged_bytes("bytes 0-0/1"), Some(1));
    }

    #[test]
    fn test_parse_acknowledged_bytes_malformed() {
        assert_eq!(parse_acknowledged_bytes(""), None);
        assert_eq!(parse_acknowledged_bytes("bytes */26214400"), None);
        assert_eq!(parse_acknowledged_bytes("bytes 0-abc/26214400"), None);
        assert_eq!(parse_acknowledged_bytes("0-100/200"), None);
    }

    #[test]
    fn test_classify_rejection_with_error_envelope() {
        let body = r#"{"error": {"code": "access_token_expired", "message": "expired"}}"#;
        let err = classify_rejection(StatusCode::UNAUTHORIZED, body);
        assert!(err.is_auth_expired());
    }

    #[test]
    fn test_classify_rejection_plain_body() {
        let err = classify_rejection(StatusCode::INTERNAL_SERVER_ERROR, "something broke");
        match err {
            Error::ServerRejected { code, message } => {
                assert_eq!(code, "http_500");
                assert_eq!(message, "something broke");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_classify_rejection_truncates_long_bodies() {
        let body = "x".repeat(2000);
        let err = classify_rejection(StatusCode::BAD_GATEWAY, &body);
        match err {
            Error::ServerRejected { message, .. } => {
                assert_eq!(message.len(), ERROR_BODY_SNIPPET_LEN)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_uses_server_echoed_range() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/upload/1"))
            .and(header_matcher("content-type", "video/mp4"))
            .and(header_matcher("content-range", "bytes 0-1023/2048"))
            .respond_with(
                ResponseTemplate::new(206)
                    .insert_header("content-range", "bytes 0-1023/2048"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transmitter = transmitter();
        let acknowledged = transmitter
            .send(
                &format!("{}/upload/1", server.uri()),
                vec![0u8; 1024],
                0,
                1023,
                2048,
            )
            .await
            .unwrap();

        assert_eq!(acknowledged, 1024);
    }

    #[tokio::test]
    async fn test_send_falls_back_to_client_range() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/upload/1"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let transmitter = transmitter();
        let acknowledged = transmitter
            .send(
                &format!("{}/upload/1", server.uri()),
                vec![0u8; 1024],
                1024,
                2047,
                2048,
            )
            .await
            .unwrap();

        assert_eq!(acknowledged, 2048);
    }

    #[tokio::test]
    async fn test_send_rejects_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/upload/1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let transmitter = transmitter();
        let err = transmitter
            .send(&format!("{}/upload/1", server.uri()), vec![0u8; 16], 0, 15, 16)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ServerRejected { .. }));
    }
}
