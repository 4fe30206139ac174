//! Shared utility functions.
//!
//! - [`content_length`] - resource size from `Content-Length` / `Content-Range`

pub mod content_length;

pub use content_length::{expected_length, parse_content_range_start, parse_content_range_total};
