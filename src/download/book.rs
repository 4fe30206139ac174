//! What the download center fetches for a book.
//!
//! # Examples
//!
//! ```rust
//! use opds_acquire::download::Book;
//! use reqwest::Url;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let url = Url::parse("https://example.com/borrow/42")?;
//! let book = Book::new("book-42", &url);
//! assert_eq!(book.identifier, "book-42");
//! # Ok(())
//! # }
//! ```

use crate::error::Error;
use crate::feed::{Entry, Link, Relation};

use reqwest::Url;

/// Acquisition relations, most preferred first. Samples are never downloaded
/// in place of the book.
const PREFERENCE: [Relation; 5] = [
    Relation::OpenAccess,
    Relation::Borrow,
    Relation::Acquisition,
    Relation::Buy,
    Relation::Subscribe,
];

/// A book to download, addressed by its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Identifier of the book; the download center keys everything by it.
    pub identifier: String,
    /// URL the asset is fetched from.
    pub url: Url,
    /// Media type announced by the catalog, if any.
    pub media_type: Option<String>,
}

impl Book {
    /// Creates a new [`Book`].
    pub fn new(identifier: &str, url: &Url) -> Self {
        Self {
            identifier: String::from(identifier),
            url: url.clone(),
            media_type: None,
        }
    }

    /// Sets the media type hint.
    pub fn with_media_type(self, media_type: Option<String>) -> Self {
        Self { media_type, ..self }
    }

    /// Picks the best acquisition link of `entry`, resolving relative
    /// targets against `base`.
    pub fn from_entry(entry: &Entry, base: Option<&Url>) -> Result<Self, Error> {
        let link = preferred_link(entry)
            .ok_or_else(|| Error::NoAcquisition(entry.identifier().to_string()))?;

        let url = match base {
            Some(base) => base.join(link.href()),
            None => Url::parse(link.href()),
        }
        .map_err(|e| {
            Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", link.href(), e))
        })?;

        Ok(Book::new(entry.identifier(), &url).with_media_type(link.media_type().map(String::from)))
    }
}

fn preferred_link(entry: &Entry) -> Option<&Link> {
    PREFERENCE
        .iter()
        .find_map(|rel| entry.acquisition_links().find(|l| l.relation() == rel))
}

impl TryFrom<&Entry> for Book {
    type Error = crate::error::Error;

    fn try_from(entry: &Entry) -> Result<Self, Self::Error> {
        Book::from_entry(entry, None)
    }
}
