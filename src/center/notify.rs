//! Change notifications.
//!
//! The center broadcasts a [`DownloadChange`] after every change to a record:
//! start, bytes received, cancellation request, terminal transition and reset.
//! Sending never blocks; an observer that falls behind the channel capacity
//! receives [`RecvError::Lagged`](tokio::sync::broadcast::error::RecvError::Lagged)
//! and misses the oldest changes.

use crate::download::{DownloadRecord, Phase};

use tokio::sync::broadcast;
use tracing::trace;

/// Well-known name of the change notification.
pub const DOWNLOAD_CENTER_DID_CHANGE: &str = "DownloadCenterDidChange";

/// A snapshot of a record right after it changed.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadChange {
    pub identifier: String,
    pub phase: Phase,
    pub bytes_received: u64,
    pub expected_bytes: Option<u64>,
    pub progress: f64,
}

impl DownloadChange {
    /// Name under which these changes are published.
    pub const NAME: &'static str = DOWNLOAD_CENTER_DID_CHANGE;

    pub(crate) fn from_record(record: &DownloadRecord) -> Self {
        Self {
            identifier: record.identifier().to_string(),
            phase: record.phase(),
            bytes_received: record.bytes_received(),
            expected_bytes: record.expected_bytes(),
            progress: record.progress(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Notifier {
    sender: broadcast::Sender<DownloadChange>,
}

impl Notifier {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<DownloadChange> {
        self.sender.subscribe()
    }

    pub(crate) fn notify(&self, record: &DownloadRecord) {
        // No subscriber is not an error.
        let delivered = self
            .sender
            .send(DownloadChange::from_record(record))
            .unwrap_or(0);
        trace!(
            "{} {} -> {:?} to {} observer(s)",
            DOWNLOAD_CENTER_DID_CHANGE,
            record.identifier(),
            record.phase(),
            delivered
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_subscriber_gets_the_change() {
        let notifier = Notifier::new(8);
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        notifier.notify(&DownloadRecord::new("book-1"));

        assert_eq!(first.recv().await.unwrap().identifier, "book-1");
        assert_eq!(second.recv().await.unwrap().phase, Phase::Idle);
    }

    #[test]
    fn test_notify_without_subscribers() {
        let notifier = Notifier::new(0);
        notifier.notify(&DownloadRecord::new("book-1"));
    }

    #[test]
    fn test_change_name() {
        assert_eq!(DownloadChange::NAME, "DownloadCenterDidChange");
    }
}
