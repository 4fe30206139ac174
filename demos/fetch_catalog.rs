//! Browses an OPDS catalog and downloads its first available book.
//!
//! ```text
//! cargo run --example fetch_catalog -- https://www.gutenberg.org/ebooks/search.opds/?sort_order=downloads
//! ```

use color_eyre::{eyre::eyre, Result};
use indicatif::{ProgressBar, ProgressStyle};
use opds_acquire::{
    create_http_client, fetch_feed, Book, DownloadCenterBuilder, HttpClientConfig, Phase,
};
use reqwest::Url;
use std::path::PathBuf;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

const DEFAULT_CATALOG: &str = "https://www.gutenberg.org/ebooks/search.opds/?sort_order=downloads";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let catalog = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CATALOG.into());
    let url = Url::parse(&catalog)?;

    let client = create_http_client(HttpClientConfig::default())?;
    let feed = fetch_feed(&client, &url).await?;
    println!("{} ({:?}, {} entries)", feed.title(), feed.feed_type(), feed.entries().len());
    for entry in feed.entries() {
        println!("  {} - {}", entry.identifier(), entry.title());
    }

    let book = feed
        .entries()
        .iter()
        .find_map(|entry| Book::from_entry(entry, Some(&url)).ok())
        .ok_or_else(|| eyre!("no entry of {} can be downloaded", url))?;

    let center = DownloadCenterBuilder::new()
        .directory(PathBuf::from("books"))
        .build()?;
    let mut rx = center.subscribe();

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.green/black} {bytes:>11.green}/{total_bytes:<11.green} {bytes_per_sec:>13.red} eta {eta:.blue}")?
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    pb.set_message(book.identifier.clone());

    center.start(&book);
    let phase = loop {
        match rx.recv().await {
            Ok(change) if change.identifier == book.identifier => {
                if let Some(total) = change.expected_bytes {
                    pb.set_length(total);
                }
                pb.set_position(change.bytes_received);
                if change.phase.is_terminal() {
                    break change.phase;
                }
            }
            Ok(_) | Err(RecvError::Lagged(_)) => (),
            Err(RecvError::Closed) => return Err(eyre!("download center went away")),
        }
    };
    pb.finish();

    match phase {
        Phase::Successful => {
            let path = center
                .asset_path(&book.identifier)
                .ok_or_else(|| eyre!("asset vanished"))?;
            println!("Saved {} to {}", book.identifier, path.display());
        }
        _ => {
            let record = center.record(&book.identifier);
            let reason = record
                .as_ref()
                .and_then(|r| r.failure())
                .map(ToString::to_string)
                .unwrap_or_else(|| format!("{:?}", phase));
            println!("Download of {} did not finish: {}", book.identifier, reason);
        }
    }

    Ok(())
}
