//! The transfer task behind [`DownloadCenter::start`].
//!
//! Streams the book into the store's partial file chunk by chunk, updating
//! the record and notifying observers after each chunk, then promotes the
//! partial file to the finished asset. All failures end up on the record;
//! nothing escapes the task.

use super::center::{lock, DownloadCenter, Slot};
use crate::download::{Book, FailureReason};
use crate::utils::{expected_length, parse_content_range_start, parse_content_range_total};

use futures::StreamExt;
use reqwest::{
    header::{CONTENT_RANGE, RANGE},
    Response, StatusCode,
};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

fn storage(e: std::io::Error) -> FailureReason {
    FailureReason::Storage(e.to_string())
}

fn transport(e: impl std::fmt::Display) -> FailureReason {
    FailureReason::Transport(e.to_string())
}

impl DownloadCenter {
    /// Runs one transfer to its terminal phase.
    pub(super) async fn run(&self, book: Book, slot: Arc<Slot>) {
        let outcome = self.transfer(&book, &slot).await;

        let record = {
            let mut record = lock(&slot);
            let phase = record.settle(outcome);
            match record.failure() {
                Some(reason) => warn!("Download of {} failed: {}", book.identifier, reason),
                None => info!("Download of {} ended as {:?}", book.identifier, phase),
            }
            self.inner.notifier.notify(&record);
            record.clone()
        };

        if let Some(ref callback) = self.inner.config.on_complete {
            callback(&record);
        }
    }

    /// Fetches the asset. `Ok` means "stop here", which becomes
    /// `Successful` or, when a cancel request is pending, `Cancelled`.
    async fn transfer(&self, book: &Book, slot: &Slot) -> Result<(), FailureReason> {
        let id = book.identifier.as_str();
        let store = &self.inner.store;

        if lock(slot).cancel_requested() {
            debug!("Download of {} cancelled before the request", id);
            return Ok(());
        }

        // Check if there is a partial file to resume from.
        let offset = if self.inner.config.resumable {
            store.partial_len(id).await.map_err(storage)?
        } else {
            0
        };

        debug!("Fetching {}", book.url);
        let mut req = self.inner.client.get(book.url.clone());
        if offset > 0 {
            debug!("Resuming {} from byte {}", id, offset);
            req = req.header(RANGE, format!("bytes={}-", offset));
        }
        match self
            .inner
            .config
            .credentials
            .as_ref()
            .and_then(|store| store.credentials())
        {
            Some(credentials) => req = req.basic_auth(&credentials.barcode, Some(&credentials.pin)),
            None => debug!("No credentials available, requesting {} anonymously", id),
        }

        let res = req.send().await.map_err(transport)?;
        let status = res.status();
        debug!("{} answered {}", book.url, status);

        if matches!(
            status,
            StatusCode::UNAUTHORIZED
                | StatusCode::FORBIDDEN
                | StatusCode::PROXY_AUTHENTICATION_REQUIRED
        ) {
            return Err(FailureReason::AuthenticationRequired {
                status: status.as_u16(),
            });
        }

        if status == StatusCode::RANGE_NOT_SATISFIABLE && offset > 0 {
            return self.finish_from_partial(id, offset, &res, slot).await;
        }

        if let Err(e) = res.error_for_status_ref() {
            return Err(transport(e));
        }

        // A 200 to a ranged request means the server restarted from zero.
        let append = offset > 0 && status == StatusCode::PARTIAL_CONTENT;
        if append {
            let start = content_range(&res).and_then(parse_content_range_start);
            if start != Some(offset) {
                return Err(FailureReason::Transport(format!(
                    "server resumed at {:?}, expected byte {}",
                    start, offset
                )));
            }
        }

        let expected = expected_length(&res);
        let mut received = if append { offset } else { 0 };
        {
            let mut record = lock(slot);
            record.set_expected(expected);
            record.advance(received);
            self.inner.notifier.notify(&record);
            if record.cancel_requested() {
                return Ok(());
            }
        }

        let mut file = store.open_partial(id, append).await.map_err(storage)?;
        if lock(slot).cancel_requested() {
            // A delete may have removed the partial file before it was reopened.
            let empty = file.metadata().await.map_err(storage)?.len() == 0;
            drop(file);
            if empty {
                store.discard_partial(id).await.map_err(storage)?;
            }
            debug!("Download of {} cancelled before the first chunk", id);
            return Ok(());
        }

        // Download the file chunk by chunk.
        debug!("Retrieving chunks of {}...", id);
        let mut stream = res.bytes_stream();
        while let Some(item) = stream.next().await {
            let mut chunk = item.map_err(transport)?;
            received += chunk.len() as u64;
            file.write_all_buf(&mut chunk).await.map_err(storage)?;

            let cancelled = {
                let mut record = lock(slot);
                record.advance(received);
                self.inner.notifier.notify(&record);
                record.cancel_requested()
            };
            if cancelled {
                debug!("Download of {} cancelled after {} bytes", id, received);
                file.flush().await.map_err(storage)?;
                return Ok(());
            }
        }
        file.flush().await.map_err(storage)?;
        file.sync_all().await.map_err(storage)?;
        drop(file);

        if let Some(expected) = expected {
            if received < expected {
                return Err(FailureReason::Transport(format!(
                    "connection closed after {} of {} bytes",
                    received, expected
                )));
            }
        }

        if lock(slot).cancel_requested() {
            return Ok(());
        }
        store.commit(id).await.map_err(storage)?;
        Ok(())
    }

    /// Handles a 416 to a ranged request: either the partial file already
    /// holds the whole book, or it is stale and gets dropped.
    async fn finish_from_partial(
        &self,
        id: &str,
        offset: u64,
        res: &Response,
        slot: &Slot,
    ) -> Result<(), FailureReason> {
        let store = &self.inner.store;
        let total = content_range(res).and_then(parse_content_range_total);
        if total == Some(offset) {
            debug!("Partial file of {} was already complete", id);
            {
                let mut record = lock(slot);
                record.set_expected(total);
                record.advance(offset);
                self.inner.notifier.notify(&record);
            }
            store.commit(id).await.map_err(storage)?;
            return Ok(());
        }

        warn!("Discarding stale partial file of {}", id);
        store.discard_partial(id).await.map_err(storage)?;
        Err(FailureReason::Transport(format!(
            "range not satisfiable (server size {:?}, local {})",
            total, offset
        )))
    }
}

fn content_range(res: &Response) -> Option<&str> {
    res.headers().get(CONTENT_RANGE).and_then(|v| v.to_str().ok())
}
