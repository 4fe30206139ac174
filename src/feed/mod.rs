//! Feed model: typed entries and links parsed from a catalog document, and
//! the classification of the whole feed.
//!
//! # Examples
//!
//! ```rust
//! use opds_acquire::feed::{Feed, FeedType};
//!
//! let feed = Feed::from_bytes(br#"
//!     <feed xmlns="http://www.w3.org/2005/Atom">
//!       <id>urn:catalog</id>
//!       <title>New books</title>
//!       <entry>
//!         <id>urn:book:1</id>
//!         <title>Moby Dick</title>
//!         <link rel="http://opds-spec.org/acquisition/borrow" href="https://example.com/borrow/1"/>
//!       </entry>
//!     </feed>"#);
//!
//! assert_eq!(feed.feed_type(), FeedType::AcquisitionUngrouped);
//! assert_eq!(feed.entries().len(), 1);
//! ```

pub mod entry;
pub mod feed;
pub mod fetch;
pub mod link;

pub use entry::Entry;
pub use feed::{classify, Feed, FeedType, Group};
pub use fetch::fetch_feed;
pub use link::{Link, Relation};
