//! Request type definitions
//!
//! Defines the structures sent to the session-initiation endpoints.

use serde::{Deserialize, Serialize};

use crate::upload::UploadPlan;

/// Delivery mode for an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    /// Deliver to the user's app inbox; publishing is completed manually
    Inbox,
    /// Publish (or queue for publishing) immediately, with post metadata
    DirectPost,
}

/// Audience setting for a direct post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivacyLevel {
    /// Visible to everyone
    PublicToEveryone,
    /// Visible to mutual-follow friends
    MutualFollowFriends,
    /// Visible to the creator's followers
    FollowerOfCreator,
    /// Visible to the creator only
    SelfOnly,
}

/// Post metadata for direct-post uploads
///
/// Field names follow the API's `post_info` block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMetadata {
    /// Post caption/title
    pub title: String,

    /// Audience setting
    pub privacy_level: PrivacyLevel,

    /// Disallow duets with this video
    pub disable_duet: bool,

    /// Disallow stitching this video
    pub disable_stitch: bool,

    /// Disallow comments on this video
    pub disable_comment: bool,

    /// Timestamp (milliseconds into the video) of the cover frame
    pub video_cover_timestamp_ms: u64,

    /// Video is branded content (paid partnership)
    pub brand_content_toggle: bool,

    /// Video promotes the creator's own business
    pub brand_organic_toggle: bool,
}

impl PostMetadata {
    /// Create metadata with the given title; everything else defaults to the
    /// most restrictive settings.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            privacy_level: PrivacyLevel::SelfOnly,
            disable_duet: false,
            disable_stitch: false,
            disable_comment: false,
            video_cover_timestamp_ms: 1000,
            brand_content_toggle: false,
            brand_organic_toggle: false,
        }
    }

    /// Set the audience
    pub fn with_privacy_level(mut self, privacy_level: PrivacyLevel) -> Self {
        self.privacy_level = privacy_level;
        self
    }

    /// Set whether duets are disabled
    pub fn with_disable_duet(mut self, disable: bool) -> Self {
        self.disable_duet = disable;
        self
    }

    /// Set whether stitches are disabled
    pub fn with_disable_stitch(mut self, disable: bool) -> Self {
        self.disable_stitch = disable;
        self
    }

    /// Set whether comments are disabled
    pub fn with_disable_comment(mut self, disable: bool) -> Self {
        self.disable_comment = disable;
        self
    }

    /// Set the cover-frame timestamp in milliseconds
    pub fn with_video_cover_timestamp_ms(mut self, timestamp_ms: u64) -> Self {
        self.video_cover_timestamp_ms = timestamp_ms;
        self
    }

    /// Set the branded-content flag
    pub fn with_brand_content_toggle(mut self, toggle: bool) -> Self {
        self.brand_content_toggle = toggle;
        self
    }

    /// Set the organic-branding flag
    pub fn with_brand_organic_toggle(mut self, toggle: bool) -> Self {
        self.brand_organic_toggle = toggle;
        self
    }
}

/// The `source_info` block declared at session initiation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Upload source type; always `FILE_UPLOAD` for this client
    pub source: String,

    /// Total video size in bytes
    pub video_size: u64,

    /// Nominal chunk size in bytes
    pub chunk_size: u64,

    /// Exact number of chunk requests that will follow
    pub total_chunk_count: u64,
}

/// Body of a session-initiation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitRequest {
    /// Declared upload geometry
    pub source_info: SourceInfo,

    /// Post metadata; present only for direct-post uploads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_info: Option<PostMetadata>,
}

impl InitRequest {
    /// Build an initiation request from a computed plan
    pub fn from_plan(plan: &UploadPlan, post_info: Option<PostMetadata>) -> Self {
        Self {
            source_info: SourceInfo {
                source: "FILE_UPLOAD".to_string(),
                video_size: plan.total_size,
                chunk_size: plan.chunk_size,
                total_chunk_count: plan.chunk_count,
            },
            post_info,
        }
    }
}
