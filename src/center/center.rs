//! The download center.
//!
//! One [`DownloadCenter`] coordinates every book download of the process. It
//! is cheap to clone: clones are handles to the same coordinator, so build it
//! once at startup and pass it to whoever needs it.
//!
//! # Locking
//!
//! Records live behind two levels of locks. The map from identifier to
//! record is locked only long enough to look up or insert a slot. Each slot
//! has its own mutex, held for a single state change and never across an
//! `.await`. Work on different books therefore never waits on each other,
//! while changes to one book's record are serialized.
//!
//! # Examples
//!
//! ```rust,no_run
//! use opds_acquire::center::DownloadCenterBuilder;
//! use opds_acquire::download::Book;
//! use reqwest::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let center = DownloadCenterBuilder::new().build()?;
//! let mut changes = center.subscribe();
//!
//! let book = Book::new("book-42", &Url::parse("https://example.com/book-42.epub")?);
//! center.start(&book);
//!
//! while let Ok(change) = changes.recv().await {
//!     println!("{} {:.0}%", change.identifier, change.progress * 100.0);
//!     if change.phase.is_terminal() {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use super::config::CenterConfig;
use super::notify::{DownloadChange, Notifier};
use crate::download::{Book, DownloadRecord, Phase};
use crate::error::Result;
use crate::http::{create_http_client, HttpClientConfig};
use crate::storage::AssetStore;

use reqwest::header::HeaderMap;
use reqwest_middleware::ClientWithMiddleware;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, info};

pub(crate) type Slot = Mutex<DownloadRecord>;

pub(crate) struct Inner {
    pub(crate) config: CenterConfig,
    pub(crate) client: ClientWithMiddleware,
    pub(crate) store: AssetStore,
    pub(crate) notifier: Notifier,
    records: Mutex<HashMap<String, Arc<Slot>>>,
}

/// Handle to the process-wide download coordinator.
///
/// Created through [`DownloadCenterBuilder`](super::DownloadCenterBuilder).
#[derive(Clone)]
pub struct DownloadCenter {
    pub(crate) inner: Arc<Inner>,
}

impl fmt::Debug for DownloadCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadCenter")
            .field("config", &self.inner.config)
            .field("records", &lock(&self.inner.records).len())
            .finish()
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DownloadCenter {
    pub(crate) fn new(config: CenterConfig) -> Result<Self> {
        let client = create_http_client(HttpClientConfig {
            retries: config.retries,
            proxy: config.proxy.clone(),
            headers: config.headers.clone(),
        })?;
        let store = AssetStore::new(config.directory.clone());
        let notifier = Notifier::new(config.event_capacity);
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                client,
                store,
                notifier,
                records: Mutex::new(HashMap::new()),
            }),
        })
    }

    /// Gets the directory where assets are stored.
    pub fn directory(&self) -> &Path {
        &self.inner.config.directory
    }

    /// Gets the number of transient retries per request.
    pub fn retries(&self) -> u32 {
        self.inner.config.retries
    }

    /// Gets whether transfers resume from partial files.
    pub fn resumable(&self) -> bool {
        self.inner.config.resumable
    }

    /// Gets the custom headers.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.inner.config.headers.as_ref()
    }

    /// Gets the notification buffer size.
    pub fn event_capacity(&self) -> usize {
        self.inner.config.event_capacity
    }

    /// Gets whether a credential lookup is configured.
    pub fn has_credentials(&self) -> bool {
        self.inner.config.credentials.is_some()
    }

    /// The asset store backing this center.
    pub fn store(&self) -> &AssetStore {
        &self.inner.store
    }

    /// Subscribes to change notifications.
    ///
    /// Each receiver sees every change published after it subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<DownloadChange> {
        self.inner.notifier.subscribe()
    }

    /// Starts downloading `book` in the background and returns right away
    /// with the record as it stands.
    ///
    /// If a transfer for the same identifier is already running, nothing
    /// happens and that transfer's record is returned. From any other phase
    /// the record is reset to [`Phase::InProgress`] with no bytes received.
    ///
    /// Credentials should be available beforehand: the center cannot ask the
    /// user for them. Without them the request goes out anyway and the record
    /// ends up [`Phase::Failed`] with
    /// [`FailureReason::AuthenticationRequired`](crate::download::FailureReason::AuthenticationRequired)
    /// if the server insists.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, book: &Book) -> DownloadRecord {
        let slot = self.slot_or_insert(&book.identifier);
        let snapshot = {
            let mut record = lock(&slot);
            if !record.phase().accepts_start() {
                debug!("Download of {} already in progress", book.identifier);
                return record.clone();
            }
            record.begin();
            self.inner.notifier.notify(&record);
            record.clone()
        };

        info!("Starting download of {} from {}", book.identifier, book.url);
        let center = self.clone();
        let book = book.clone();
        tokio::spawn(async move { center.run(book, slot).await });

        snapshot
    }

    /// Asks the running transfer of `identifier` to stop.
    ///
    /// Cancellation is cooperative: the transfer notices the request at its
    /// next chunk boundary, so at most one more chunk is written before the
    /// record settles at [`Phase::Cancelled`]. Does nothing, and notifies
    /// nobody, when no transfer is running.
    pub fn cancel(&self, identifier: &str) {
        let Some(slot) = self.slot(identifier) else {
            debug!("Nothing to cancel for {}", identifier);
            return;
        };
        let mut record = lock(&slot);
        if record.request_cancel() {
            info!("Cancelling download of {}", identifier);
            self.inner.notifier.notify(&record);
        }
    }

    /// Progress of `identifier` in `[0.0, 1.0]`.
    ///
    /// 0.0 for unknown books. Progress stays available for the lifetime of
    /// the center, including after failures and cancellations.
    pub fn progress(&self, identifier: &str) -> f64 {
        self.slot(identifier)
            .map(|slot| lock(&slot).progress())
            .unwrap_or(0.0)
    }

    /// A snapshot of the record of `identifier`.
    pub fn record(&self, identifier: &str) -> Option<DownloadRecord> {
        self.slot(identifier).map(|slot| lock(&slot).clone())
    }

    /// The current phase of `identifier`.
    pub fn phase(&self, identifier: &str) -> Option<Phase> {
        self.slot(identifier).map(|slot| lock(&slot).phase())
    }

    /// Where the finished asset of `identifier` is, once downloaded.
    pub fn asset_path(&self, identifier: &str) -> Option<PathBuf> {
        (self.phase(identifier) == Some(Phase::Successful) && self.inner.store.contains(identifier))
            .then(|| self.inner.store.asset_path(identifier))
    }

    /// Removes everything stored for `identifier`.
    ///
    /// A running transfer is cancelled first and settles at
    /// [`Phase::Cancelled`] on its own; any other record goes back to
    /// [`Phase::Idle`].
    pub async fn delete_local_content(&self, identifier: &str) -> io::Result<()> {
        self.cancel(identifier);
        self.inner.store.remove(identifier).await?;

        if let Some(slot) = self.slot(identifier) {
            let mut record = lock(&slot);
            if record.phase() != Phase::InProgress {
                record.reset();
                self.inner.notifier.notify(&record);
            }
        }
        info!("Deleted local content of {}", identifier);
        Ok(())
    }

    fn slot(&self, identifier: &str) -> Option<Arc<Slot>> {
        lock(&self.inner.records).get(identifier).cloned()
    }

    fn slot_or_insert(&self, identifier: &str) -> Arc<Slot> {
        lock(&self.inner.records)
            .entry(identifier.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(DownloadRecord::new(identifier))))
            .clone()
    }
}
