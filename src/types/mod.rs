//! Type definitions for the upload client
//!
//! This module contains the wire-level data structures exchanged with the
//! Content Posting API and the OAuth token endpoint.

pub mod request;
pub mod response;

pub use request::{InitRequest, PostMetadata, PrivacyLevel, SourceInfo, UploadMode};
pub use response::{ApiError, InitResponse, TokenResponse};
