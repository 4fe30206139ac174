//! Builder pattern implementation for creating [`DownloadCenter`] instances.
//!
//! # Examples
//!
//! ```rust
//! use opds_acquire::auth::{Credentials, StaticCredentials};
//! use opds_acquire::center::DownloadCenterBuilder;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Arc::new(StaticCredentials::new(Credentials::new("2345", "0000")));
//! let center = DownloadCenterBuilder::new()
//!     .directory(PathBuf::from("./books"))
//!     .credentials(credentials)
//!     .on_complete(|record| println!("{} -> {:?}", record.identifier(), record.phase()))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use super::center::DownloadCenter;
use super::config::CenterConfig;
use crate::auth::CredentialStore;
use crate::download::DownloadRecord;
use crate::error::Result;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use std::{path::PathBuf, sync::Arc};

/// A builder used to create a [`DownloadCenter`].
///
/// ```rust
/// # fn main() -> Result<(), opds_acquire::Error> {
/// use opds_acquire::center::DownloadCenterBuilder;
///
/// let center = DownloadCenterBuilder::new().retries(1).directory("books".into()).build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct DownloadCenterBuilder {
    config: CenterConfig,
}

impl DownloadCenterBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloadCenterBuilder::default()
    }

    /// Sets the directory where to store the book assets.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = directory;
        self
    }

    /// Set the number of transient retries per request.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Resume transfers from partial files when possible.
    pub fn resumable(mut self, resumable: bool) -> Self {
        self.config.resumable = resumable;
        self
    }

    /// Set how many change notifications are buffered per observer.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.config.event_capacity = capacity;
        self
    }

    /// Set the credential lookup used before each transfer.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.config.credentials = Some(credentials);
        self
    }

    /// Route requests through `proxy`.
    pub fn proxy(mut self, proxy: reqwest::Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Set callback for when each transfer ends.
    ///
    /// The callback runs on the transfer task, after the record reached its
    /// terminal phase and the change notification went out.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&DownloadRecord) + Send + Sync + 'static,
    {
        self.config.on_complete = Some(Arc::new(Box::new(callback)));
        self
    }

    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add the http headers.
    ///
    /// Calling `.headers()` several times merges all maps.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Add the http header.
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Create the [`DownloadCenter`] with the specified options.
    ///
    /// Fails only when the HTTP client cannot be built.
    pub fn build(self) -> Result<DownloadCenter> {
        DownloadCenter::new(self.config)
    }
}
