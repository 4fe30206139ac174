//! Content length extraction utilities.
//!
//! Used by the transfer loop to learn how many bytes a book has in total,
//! both for fresh requests and for resumed ranged requests.

use reqwest::{header::CONTENT_RANGE, Response, StatusCode};

/// Total size of the resource a response belongs to.
///
/// For `206 Partial Content` the total comes from `Content-Range`. Otherwise
/// the body is the whole resource and `Content-Length` is the total. `None`
/// when the server does not say.
pub fn expected_length(response: &Response) -> Option<u64> {
    if response.status() == StatusCode::PARTIAL_CONTENT {
        response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
    } else {
        response.content_length()
    }
}

/// Total size from a `Content-Range` header value.
///
/// Content-Range header format: "bytes start-end/total", or "bytes */total"
/// on a 416 reply. An unknown total ("*") gives `None`.
///
/// ```rust
/// use opds_acquire::utils::parse_content_range_total;
///
/// assert_eq!(parse_content_range_total("bytes 0-1023/2048"), Some(2048));
/// assert_eq!(parse_content_range_total("bytes 0-1023/*"), None);
/// ```
pub fn parse_content_range_total(content_range: &str) -> Option<u64> {
    let (_, total) = content_range.rsplit_once('/')?;
    total.trim().parse::<u64>().ok()
}

/// First byte position from a `Content-Range` header value.
///
/// ```rust
/// use opds_acquire::utils::parse_content_range_start;
///
/// assert_eq!(parse_content_range_start("bytes 200-1023/1024"), Some(200));
/// assert_eq!(parse_content_range_start("bytes */1024"), None);
/// ```
pub fn parse_content_range_start(content_range: &str) -> Option<u64> {
    let range = content_range.trim().strip_prefix("bytes")?.trim_start();
    let (start, _) = range.split_once('-')?;
    start.trim().parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("bytes 0-1023/2048"), Some(2048));
        assert_eq!(parse_content_range_total("bytes 200-1023/5000"), Some(5000));
        assert_eq!(parse_content_range_total("bytes */300"), Some(300));
        assert_eq!(parse_content_range_total("invalid"), None);
        assert_eq!(parse_content_range_total("bytes 0-1023"), None);
        assert_eq!(parse_content_range_total(""), None);
    }

    #[test]
    fn test_parse_content_range_total_edge_cases() {
        assert_eq!(parse_content_range_total("bytes 0-1023/ 2048 "), Some(2048));
        assert_eq!(parse_content_range_total("bytes 0-0/0"), Some(0));
        assert_eq!(
            parse_content_range_total("bytes 0-1023/999999999999"),
            Some(999999999999)
        );
    }

    #[test]
    fn test_parse_content_range_start() {
        assert_eq!(parse_content_range_start("bytes 100-299/300"), Some(100));
        assert_eq!(parse_content_range_start("bytes 0-0/1"), Some(0));
        assert_eq!(parse_content_range_start("items 1-2/3"), None);
        assert_eq!(parse_content_range_start(""), None);
    }
}
