//! Per-book download state.
//!
//! A [`DownloadRecord`] moves through the phases
//! `Idle -> InProgress -> {Successful, Failed, Cancelled}`. Only the download
//! center mutates records; everybody else sees snapshots.

use thiserror::Error;

/// Stage of a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Known to the center, nothing running.
    Idle,
    /// A transfer is running.
    InProgress,
    /// The asset is stored and retrievable.
    Successful,
    /// The transfer stopped on an error; see [`DownloadRecord::failure`].
    Failed,
    /// The transfer stopped because it was cancelled.
    Cancelled,
}

impl Phase {
    /// Whether the phase ends a transfer.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Successful | Phase::Failed | Phase::Cancelled)
    }

    /// Whether a new transfer may start from this phase.
    pub fn accepts_start(self) -> bool {
        self != Phase::InProgress
    }
}

/// Why a transfer failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The server refused the request for lack of valid credentials.
    #[error("authentication required (HTTP {status})")]
    AuthenticationRequired { status: u16 },

    /// The request or the body stream failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The asset could not be written to storage.
    #[error("storage error: {0}")]
    Storage(String),
}

impl FailureReason {
    /// The user must (re-)enter credentials before trying again.
    pub fn requires_authentication(&self) -> bool {
        matches!(self, FailureReason::AuthenticationRequired { .. })
    }

    /// Trying again as is may succeed.
    pub fn is_retryable(&self) -> bool {
        !self.requires_authentication()
    }
}

/// State of one book's download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRecord {
    identifier: String,
    phase: Phase,
    bytes_received: u64,
    expected_bytes: Option<u64>,
    cancel_requested: bool,
    failure: Option<FailureReason>,
}

impl DownloadRecord {
    /// A fresh, idle record.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            phase: Phase::Idle,
            bytes_received: 0,
            expected_bytes: None,
            cancel_requested: false,
            failure: None,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    pub fn expected_bytes(&self) -> Option<u64> {
        self.expected_bytes
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel_requested
    }

    /// The failure reason, set only in [`Phase::Failed`].
    pub fn failure(&self) -> Option<&FailureReason> {
        self.failure.as_ref()
    }

    /// Completion ratio in `[0.0, 1.0]`.
    ///
    /// 1.0 once successful. While running, or after a failure or
    /// cancellation, `bytes_received / expected_bytes`; 0.0 when the total is
    /// unknown.
    pub fn progress(&self) -> f64 {
        if self.phase == Phase::Successful {
            return 1.0;
        }
        match self.expected_bytes {
            Some(expected) if expected > 0 => {
                (self.bytes_received as f64 / expected as f64).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    /// Enters [`Phase::InProgress`] with counters reset.
    pub(crate) fn begin(&mut self) {
        self.phase = Phase::InProgress;
        self.bytes_received = 0;
        self.expected_bytes = None;
        self.cancel_requested = false;
        self.failure = None;
    }

    pub(crate) fn set_expected(&mut self, expected: Option<u64>) {
        self.expected_bytes = expected;
    }

    /// Records that `total` bytes are now on disk. Never moves backwards.
    pub(crate) fn advance(&mut self, total: u64) {
        if total > self.bytes_received {
            self.bytes_received = total;
        }
    }

    /// Flags a running transfer for cancellation. Returns `false` when
    /// there is nothing to cancel.
    pub(crate) fn request_cancel(&mut self) -> bool {
        if self.phase != Phase::InProgress || self.cancel_requested {
            return false;
        }
        self.cancel_requested = true;
        true
    }

    /// Moves a running transfer to its terminal phase.
    ///
    /// A pending cancellation wins over both success and failure.
    pub(crate) fn settle(&mut self, outcome: Result<(), FailureReason>) -> Phase {
        self.phase = match (self.cancel_requested, outcome) {
            (true, _) => Phase::Cancelled,
            (false, Ok(())) => {
                if let Some(expected) = self.expected_bytes {
                    self.advance(expected);
                }
                Phase::Successful
            }
            (false, Err(reason)) => {
                self.failure = Some(reason);
                Phase::Failed
            }
        };
        self.phase
    }

    /// Back to [`Phase::Idle`], forgetting all progress.
    pub(crate) fn reset(&mut self) {
        let identifier = std::mem::take(&mut self.identifier);
        *self = DownloadRecord::new(identifier);
    }
}
