//! Tests for utils module functionality.

use opds_acquire::utils::{expected_length, parse_content_range_start, parse_content_range_total};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::helpers::*;

#[test]
fn test_parse_content_range_total() {
    let cases = [
        ("bytes 0-1023/2048", Some(2048)),
        ("bytes 100-299/300", Some(300)),
        ("bytes */300", Some(300)),
        ("bytes 0-1023/*", None),
        ("garbage", None),
    ];
    for (header, expected) in cases {
        assert_eq!(parse_content_range_total(header), expected, "{}", header);
    }
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
    assert_eq!(parse_content_range_start(" bytes 0-9/10"), Some(0));
    assert_eq!(parse_content_range_start("bytes */300"), None);
    assert_eq!(parse_content_range_start("items 1-2/3"), None);
}

#[tokio::test]
async fn test_expected_length_of_full_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(create_test_content(512)))
        .mount(&server)
        .await;

    let res = reqwest::Client::new().get(server.uri()).send().await.unwrap();
    assert_eq!(expected_length(&res), Some(512));
}

#[tokio::test]
async fn test_expected_length_of_partial_response_is_the_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("content-range", "bytes 100-299/300")
                .set_body_bytes(create_test_content(200)),
        )
        .mount(&server)
        .await;

    let res = reqwest::Client::new().get(server.uri()).send().await.unwrap();
    assert_eq!(expected_length(&res), Some(300));
}

#[tokio::test]
async fn test_expected_length_of_partial_response_without_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("content-range", "bytes 100-299/*")
                .set_body_bytes(create_test_content(200)),
        )
        .mount(&server)
        .await;

    let res = reqwest::Client::new().get(server.uri()).send().await.unwrap();
    assert_eq!(expected_length(&res), None);
}
