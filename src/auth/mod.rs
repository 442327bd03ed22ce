//! Credential handling for the upload client
//!
//! This module owns the credential value type, the refresh-token exchange
//! against the OAuth token endpoint, and the persistence seam for refreshed
//! credentials. The authorization-code flow itself (browser capture) is out
//! of scope; callers arrive here with an already-minted bearer token.

pub mod credentials;
pub mod refresher;
pub mod store;

pub use credentials::Credentials;
pub use refresher::CredentialRefresher;
pub use store::{CredentialStore, MemoryCredentialStore};
