//! Digest authentication for the web console.
//!
//! - [`DigestGateway`] decides whether a request is trusted
//! - [`CredentialStore`] supplies password digests for users in [`ADMIN_DB`]
//! - [`digest`] holds the header tokenizer and hash helpers

mod credentials;
pub mod digest;
mod gateway;

pub use credentials::{
    ADMIN_DB, CredentialError, CredentialStore, Credentials, InMemoryCredentialStore, User,
    UserName,
};
pub use digest::{DigestParams, FIXED_NONCE, password_digest};
pub use gateway::{AuthError, AuthOutcome, DigestGateway, Principal};
