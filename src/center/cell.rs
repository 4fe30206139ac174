//! Projection of download state onto book cell states.
//!
//! Book cells in a UI show one of five states. Which one is a pure function of
//! the book's [`DownloadRecord`] and what the user owns, so nothing here is
//! stored. Cells send commands back through [`CellDelegate`], which the UI
//! typically holds as a `Weak<dyn CellDelegate>`; the center never references
//! a cell.

use super::center::DownloadCenter;
use crate::download::{Book, DownloadRecord, Phase};

use std::path::PathBuf;
use tracing::warn;

/// What a book cell offers the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Not held by the user; can be borrowed.
    CanBorrow,
    /// Free to keep; can be downloaded without borrowing.
    CanKeep,
    /// Held by the user but not on the device (or the last attempt stopped).
    DownloadNeeded,
    /// On the device, not opened yet.
    DownloadSuccessful,
    /// On the device and already opened.
    Used,
}

/// What the user holds for a book, as known by the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ownership {
    /// Borrowed or bought.
    pub acquired: bool,
    /// Offered under open access.
    pub open_access: bool,
    /// Opened at least once.
    pub opened: bool,
}

/// Derives the cell state of a book.
pub fn cell_state(record: Option<&DownloadRecord>, ownership: Ownership) -> CellState {
    match record.map(DownloadRecord::phase) {
        Some(Phase::Successful) if ownership.opened => CellState::Used,
        Some(Phase::Successful) => CellState::DownloadSuccessful,
        Some(Phase::InProgress | Phase::Failed | Phase::Cancelled) => CellState::DownloadNeeded,
        None | Some(Phase::Idle) => {
            if ownership.acquired {
                CellState::DownloadNeeded
            } else if ownership.open_access {
                CellState::CanKeep
            } else {
                CellState::CanBorrow
            }
        }
    }
}

/// Commands a book cell can issue.
pub trait CellDelegate: Send + Sync {
    fn did_select_download(&self, book: &Book);
    fn did_select_delete(&self, identifier: &str);
    /// Returns the asset to open, if there is one.
    fn did_select_read(&self, identifier: &str) -> Option<PathBuf>;
}

impl CellDelegate for DownloadCenter {
    fn did_select_download(&self, book: &Book) {
        self.start(book);
    }

    /// Deletion runs in the background. Must be called from within a Tokio
    /// runtime.
    fn did_select_delete(&self, identifier: &str) {
        let center = self.clone();
        let identifier = identifier.to_string();
        tokio::spawn(async move {
            if let Err(e) = center.delete_local_content(&identifier).await {
                warn!("Could not delete local content of {}: {}", identifier, e);
            }
        });
    }

    fn did_select_read(&self, identifier: &str) -> Option<PathBuf> {
        self.asset_path(identifier)
    }
}
