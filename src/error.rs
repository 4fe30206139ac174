//! Error handling for the acquisition core.
//!
//! Feed parsing and feed fetching report failures through [`Error`]. Download
//! transfers never return an [`Error`] to the caller of
//! [`DownloadCenter::start`](crate::center::DownloadCenter::start): their
//! failures are recorded on the download record as a
//! [`FailureReason`](crate::download::FailureReason) instead.

use std::io;
use thiserror::Error;

/// Errors that can happen while parsing or fetching catalog feeds.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The document has no recognizable feed container.
    ///
    /// [`Feed::from_bytes`](crate::feed::Feed::from_bytes) never returns this;
    /// it yields a feed of type [`FeedType::Invalid`](crate::feed::FeedType::Invalid)
    /// instead. It is reported by the strict entry points only.
    #[error("Invalid feed: {0}")]
    InvalidFeed(String),

    /// An entry is missing one of its mandatory fields.
    ///
    /// Feeds absorb this error locally by skipping the entry.
    #[error("Malformed entry {}: {reason}", .identifier.as_deref().unwrap_or("<unidentified>"))]
    MalformedEntry {
        /// The entry identifier, when it could be read.
        identifier: Option<String>,
        /// What was missing.
        reason: String,
    },

    /// The entry offers no link a book can be acquired from.
    #[error("No acquisition link for entry {0}")]
    NoAcquisition(String),

    /// Error from the XML tokenizer.
    #[error("XML error")]
    Xml {
        #[from]
        source: quick_xml::Error,
    },

    /// I/O Error.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error raised by the HTTP middleware stack (retry, tracing).
    #[error("HTTP middleware error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },
}

/// Result type alias for fallible operations of this crate.
pub type Result<T> = std::result::Result<T, Error>;
