//! The download center: one coordinator per process that runs at most one
//! transfer per book, answers progress queries, and broadcasts every change.
//!
//! The module is organized into:
//!
//! - `center` - [`DownloadCenter`] with start/cancel/progress and queries
//! - `builder` - [`DownloadCenterBuilder`]
//! - `config` - [`CenterConfig`] and the completion callback type
//! - `notify` - [`DownloadChange`] notifications
//! - `transfer` - the background transfer task
//! - `cell` - projection of records onto UI cell states
//!
//! # Examples
//!
//! ```rust
//! use opds_acquire::center::DownloadCenterBuilder;
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), opds_acquire::Error> {
//! let center = DownloadCenterBuilder::new()
//!     .directory(PathBuf::from("./books"))
//!     .build()?;
//! assert_eq!(center.progress("never-started"), 0.0);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod cell;
pub mod center;
pub mod config;
pub mod notify;
mod transfer;

pub use builder::DownloadCenterBuilder;
pub use cell::{cell_state, CellDelegate, CellState, Ownership};
pub use center::DownloadCenter;
pub use config::{CenterConfig, CompletionCallback};
pub use notify::{DownloadChange, DOWNLOAD_CENTER_DID_CHANGE};
