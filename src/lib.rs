//! Acquisition core of an e-book reading client.
//!
//! It fetches OPDS catalog feeds, classifies them, and downloads the books
//! they offer, one resumable transfer per book, broadcasting every state
//! change to observers.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use opds_acquire::{Book, DownloadCenterBuilder, Feed, FeedType};
//! use reqwest::Url;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let url = Url::parse("https://library.example/feeds/new")?;
//! let client = opds_acquire::create_http_client(Default::default())?;
//! let feed = opds_acquire::fetch_feed(&client, &url).await?;
//!
//! if feed.feed_type() == FeedType::AcquisitionUngrouped {
//!     let center = DownloadCenterBuilder::new().build()?;
//!     let book = Book::from_entry(&feed.entries()[0], Some(&url))?;
//!     center.start(&book);
//!     println!("{:.0}%", center.progress(&book.identifier) * 100.0);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`xml`] - the XML document tree the feed model reads
//! - [`feed`] - feeds, entries, links and feed classification
//! - [`download`] - books to fetch and per-book download records
//! - [`center`] - the [`DownloadCenter`] coordinator and its builder
//! - [`auth`] - credential lookup
//! - [`storage`] - durable per-book asset storage
//! - [`error`] - the [`Error`] enum
//! - [`http`] - HTTP client construction
//! - [`utils`] - shared helpers

pub mod auth;
pub mod center;
pub mod download;
pub mod error;
pub mod feed;
pub mod http;
pub mod storage;
pub mod utils;
pub mod xml;

pub use auth::{CredentialStore, Credentials, StaticCredentials};
pub use center::{
    cell_state, CellDelegate, CellState, DownloadCenter, DownloadCenterBuilder, DownloadChange,
    Ownership, DOWNLOAD_CENTER_DID_CHANGE,
};
pub use download::{Book, DownloadRecord, FailureReason, Phase};
pub use error::{Error, Result};
pub use feed::{classify, fetch_feed, Entry, Feed, FeedType, Link, Relation};
pub use http::{create_http_client, HttpClientConfig};
pub use storage::AssetStore;
