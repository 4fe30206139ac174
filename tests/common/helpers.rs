#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use opds_acquire::{Book, DownloadCenter, DownloadCenterBuilder, DownloadChange, Phase};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Url;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tracing_subscriber::EnvFilter;

// Common test constants
pub const TEST_USER_AGENT: &str = "opds-acquire-test-agent";
pub const WAIT: Duration = Duration::from_secs(10);

pub const UNGROUPED_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:opds="http://opds-spec.org/2010/catalog">
  <id>urn:feed:new</id>
  <title>New Arrivals</title>
  <updated>2014-06-02T16:59:57Z</updated>
  <link rel="self" href="/feeds/new" type="application/atom+xml;profile=opds-catalog;kind=acquisition"/>
  <link rel="next" href="/feeds/new?page=2" type="application/atom+xml;profile=opds-catalog;kind=acquisition"/>
  <entry>
    <id>urn:book:moby-dick</id>
    <title>Moby Dick</title>
    <updated>2014-06-01T08:00:00Z</updated>
    <author><name>Herman Melville</name></author>
    <link rel="http://opds-spec.org/image/thumbnail" href="/covers/moby.jpg" type="image/jpeg"/>
    <link rel="http://opds-spec.org/acquisition/borrow" href="/borrow/moby-dick" type="application/epub+zip"/>
  </entry>
</feed>"#;

pub const GROUPED_FEED: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <id>urn:feed:home</id>
  <title>Home</title>
  <entry>
    <id>urn:book:1</id><title>One</title>
    <link rel="collection" href="/groups/fiction" title="Fiction"/>
    <link rel="http://opds-spec.org/acquisition/borrow" href="/borrow/1"/>
  </entry>
  <entry>
    <id>urn:book:2</id><title>Two</title>
    <link rel="collection" href="/groups/fiction" title="Fiction"/>
  </entry>
  <entry>
    <id>urn:book:3</id><title>Three</title>
    <link rel="http://opds-spec.org/group" href="/groups/history" title="History"/>
    <link rel="http://opds-spec.org/acquisition/open-access" href="/free/3"/>
  </entry>
</feed>"#;

pub const NAVIGATION_FEED: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <id>urn:feed:nav</id>
  <title>Browse</title>
  <entry>
    <id>urn:lane:fiction</id><title>Fiction</title>
    <link rel="subsection" href="/lanes/fiction" type="application/atom+xml;profile=opds-catalog;kind=acquisition"/>
  </entry>
  <entry>
    <id>urn:lane:poetry</id><title>Poetry</title>
    <link href="/lanes/poetry" type="application/atom+xml;profile=opds-catalog;kind=navigation"/>
  </entry>
</feed>"#;

pub const SUBSECTION_FEED: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <id>urn:feed:lanes</id>
  <title>Lanes</title>
  <entry>
    <id>urn:lane:fiction</id><title>Fiction</title>
    <link rel="subsection" href="/fiction"/>
  </entry>
  <entry>
    <id>urn:lane:history</id><title>History</title>
    <link rel="subsection" href="/history"/>
  </entry>
</feed>"#;

pub const GROUPED_LANES_FEED: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <id>urn:feed:grouped-lanes</id>
  <title>Grouped lanes</title>
  <entry>
    <id>urn:lane:fiction</id><title>Fiction</title>
    <link rel="collection" href="/groups/featured" title="Featured"/>
    <link rel="subsection" href="/fiction"/>
  </entry>
</feed>"#;

pub const EMPTY_FEED: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <id>urn:feed:empty</id>
  <title>Nothing here</title>
  <link rel="self" href="/feeds/empty"/>
</feed>"#;

pub const NOT_A_FEED: &str = r#"<html><body><entry><id>x</id><title>y</title></entry></body></html>"#;

pub const MALFORMED_ENTRY_FEED: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <id>urn:feed:mixed</id>
  <title>Mixed</title>
  <entry>
    <title>No identifier</title>
    <link rel="http://opds-spec.org/acquisition/borrow" href="/borrow/none"/>
  </entry>
  <entry>
    <id>urn:book:ok</id><title>Fine</title>
    <link rel="http://opds-spec.org/acquisition/borrow" href="/borrow/ok"/>
    <link rel="http://example.com/rel/lend" href="/lend/ok"/>
  </entry>
  <entry>
    <id>urn:book:untitled</id>
  </entry>
</feed>"#;

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates test file content of specified size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

/// Creates test headers with common user agent
pub fn create_test_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(TEST_USER_AGENT));
    headers
}

/// Routes library logs to the test output, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates a download center storing into `dir` with a roomy notification buffer
pub fn create_test_center(dir: &Path) -> DownloadCenter {
    create_test_center_builder(dir)
        .build()
        .expect("Failed to build download center")
}

pub fn create_test_center_builder(dir: &Path) -> DownloadCenterBuilder {
    init_tracing();
    DownloadCenterBuilder::new()
        .directory(dir.to_path_buf())
        .event_capacity(4096)
}

/// Creates a book pointing at `path` on `base`
pub fn create_test_book(base: &str, identifier: &str, path: &str) -> Book {
    let url = Url::parse(base)
        .and_then(|u| u.join(path))
        .expect("Failed to build book URL");
    Book::new(identifier, &url)
}

/// Collects the changes of `identifier` until it reaches a terminal phase
pub async fn collect_until_terminal(
    rx: &mut broadcast::Receiver<DownloadChange>,
    identifier: &str,
) -> Vec<DownloadChange> {
    let mut changes = Vec::new();
    tokio::time::timeout(WAIT, async {
        loop {
            match rx.recv().await {
                Ok(change) if change.identifier == identifier => {
                    let done = change.phase.is_terminal();
                    changes.push(change);
                    if done {
                        break;
                    }
                }
                Ok(_) => (),
                Err(broadcast::error::RecvError::Lagged(_)) => (),
                Err(broadcast::error::RecvError::Closed) => panic!("notifications closed"),
            }
        }
    })
    .await
    .expect("Download did not finish in time");
    changes
}

/// Waits for `identifier` to reach a terminal phase and returns that phase
pub async fn wait_for_terminal(
    rx: &mut broadcast::Receiver<DownloadChange>,
    identifier: &str,
) -> Phase {
    collect_until_terminal(rx, identifier)
        .await
        .last()
        .map(|c| c.phase)
        .expect("No change received")
}

/// Waits for the first change of `identifier` matching `matches`
pub async fn wait_for_change<F>(
    rx: &mut broadcast::Receiver<DownloadChange>,
    identifier: &str,
    matches: F,
) -> DownloadChange
where
    F: Fn(&DownloadChange) -> bool,
{
    tokio::time::timeout(WAIT, async {
        loop {
            if let Ok(change) = rx.recv().await {
                if change.identifier == identifier && matches(&change) {
                    return change;
                }
            }
        }
    })
    .await
    .expect("Expected change never arrived")
}

/// Waits until a change for `identifier` reports at least `bytes` received
pub async fn wait_for_bytes(
    rx: &mut broadcast::Receiver<DownloadChange>,
    identifier: &str,
    bytes: u64,
) {
    wait_for_change(rx, identifier, |c| c.bytes_received >= bytes).await;
}

/// Serves `body` once, sending the first `split` bytes and then stalling
/// until the returned sender fires.
pub async fn spawn_stalling_server(body: Vec<u8>, split: usize) -> (String, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (release_tx, release_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;

        let head = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/epub+zip\r\ncontent-length: {}\r\n\r\n",
            body.len()
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&body[..split]).await.unwrap();
        socket.flush().await.unwrap();

        let _ = release_rx.await;
        let _ = socket.write_all(&body[split..]).await;
        let _ = socket.flush().await;
    });

    (format!("http://{}/", addr), release_tx)
}
