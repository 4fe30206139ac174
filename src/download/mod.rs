//! Download model: what to fetch, and the per-book state the download
//! center keeps while fetching it.
//!
//! - [`book`] - the [`Book`] request, built by hand or from a feed entry
//! - [`record`] - [`DownloadRecord`], its [`Phase`] and [`FailureReason`]
//!
//! # Examples
//!
//! ```rust
//! use opds_acquire::download::{DownloadRecord, Phase};
//!
//! let record = DownloadRecord::new("book-42");
//! assert_eq!(record.phase(), Phase::Idle);
//! assert_eq!(record.progress(), 0.0);
//! ```

pub mod book;
pub mod record;

pub use book::Book;
pub use record::{DownloadRecord, FailureReason, Phase};
