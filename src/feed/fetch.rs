//! Fetching feeds over HTTP.

use super::feed::Feed;
use crate::error::{Error, Result};
use crate::http::{create_http_client, HttpClientConfig};

use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use tokio::task::JoinHandle;
use tracing::debug;

/// Downloads and parses the feed at `url`.
///
/// HTTP error statuses are errors. A body that is not a feed is not: it is
/// returned as a [`FeedType::Invalid`](super::FeedType::Invalid) feed.
pub async fn fetch_feed(client: &ClientWithMiddleware, url: &Url) -> Result<Feed> {
    debug!("Fetching feed {}", url);
    let res = client.get(url.clone()).send().await?;
    let res = res.error_for_status()?;
    let body = res.bytes().await?;
    debug!("Received {} bytes of feed {}", body.len(), url);
    Ok(Feed::from_bytes(&body))
}

impl Feed {
    /// Fetches the feed at `url` in the background and hands the result to
    /// `handler`, exactly once. The request is sent once; failures are not
    /// retried.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn with_url<F>(url: &str, handler: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<Feed>) + Send + 'static,
    {
        let url = Url::parse(url)
            .map_err(|e| Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", url, e)));
        tokio::spawn(async move {
            let result = match url {
                Ok(url) => match create_http_client(HttpClientConfig {
                    retries: 0,
                    ..HttpClientConfig::default()
                }) {
                    Ok(client) => fetch_feed(&client, &url).await,
                    Err(e) => Err(e.into()),
                },
                Err(e) => Err(e),
            };
            handler(result);
        })
    }
}
