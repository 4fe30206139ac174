//! Credential lookup.
//!
//! The download center does not collect or store credentials. It asks a
//! [`CredentialStore`] for them right before each transfer and sends them as
//! HTTP Basic authentication when present.

pub mod credentials;

pub use credentials::{CredentialStore, Credentials, StaticCredentials};
