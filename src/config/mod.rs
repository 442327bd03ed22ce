//! Configuration management for the upload client
//!
//! This module handles loading and managing the API endpoint and HTTP
//! timeout settings used by the upload components.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::Settings;
