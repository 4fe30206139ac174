//! Configuration of the download center.
//!
//! [`CenterConfig`] is filled in by the
//! [`DownloadCenterBuilder`](super::DownloadCenterBuilder); its defaults are
//! listed on [`CenterConfig::default`].
//!
//! # Examples
//!
//! ```rust
//! use opds_acquire::center::CompletionCallback;
//! use opds_acquire::download::Phase;
//!
//! let callback: CompletionCallback = Box::new(|record| match record.phase() {
//!     Phase::Successful => println!("✓ {}", record.identifier()),
//!     Phase::Failed => println!("✗ {}: {:?}", record.identifier(), record.failure()),
//!     _ => println!("- {}", record.identifier()),
//! });
//! ```

use crate::auth::CredentialStore;
use crate::download::DownloadRecord;

use reqwest::header::HeaderMap;
use std::env::current_dir;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Callback invoked with the final record whenever a transfer ends.
pub type CompletionCallback = Box<dyn Fn(&DownloadRecord) + Send + Sync>;

/// Configuration structure for the download center.
#[derive(Clone)]
pub struct CenterConfig {
    /// Directory where book assets are stored.
    pub directory: PathBuf,
    /// Transient request retries done by the HTTP layer. The center itself
    /// never restarts a failed transfer.
    pub retries: u32,
    /// Resume from a partial file when the server allows it.
    pub resumable: bool,
    /// Custom HTTP headers.
    pub headers: Option<HeaderMap>,
    /// Optional proxy configuration.
    pub proxy: Option<reqwest::Proxy>,
    /// Capacity of the change notification channel.
    pub event_capacity: usize,
    /// Where credentials are looked up before each transfer.
    pub credentials: Option<Arc<dyn CredentialStore>>,
    /// Callback for when each transfer ends.
    pub on_complete: Option<Arc<CompletionCallback>>,
}

impl fmt::Debug for CenterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CenterConfig")
            .field("directory", &self.directory)
            .field("retries", &self.retries)
            .field("resumable", &self.resumable)
            .field("headers", &self.headers)
            .field("proxy", &self.proxy)
            .field("event_capacity", &self.event_capacity)
            .field("credentials", &self.credentials.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl Default for CenterConfig {
    /// `./books`, no retries, resumable, 256 buffered notifications, no
    /// credentials, no callback.
    fn default() -> Self {
        Self {
            directory: current_dir().unwrap_or_default().join("books"),
            retries: 0,
            resumable: true,
            headers: None,
            proxy: None,
            event_capacity: 256,
            credentials: None,
            on_complete: None,
        }
    }
}
