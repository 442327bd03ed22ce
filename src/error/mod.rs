//! Error handling for the upload client
//!
//! This module defines error types and handling patterns used throughout the crate.

pub mod types;

pub use types::{Error, FailureKind, Result};
