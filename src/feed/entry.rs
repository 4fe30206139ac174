//! Catalog entries.

use super::link::{Link, Relation};
use crate::error::{Error, Result};
use crate::xml::XmlElement;

use chrono::{DateTime, Utc};

/// One catalog item.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    identifier: String,
    title: String,
    links: Vec<Link>,
    updated: Option<DateTime<Utc>>,
    authors: Vec<String>,
    summary: Option<String>,
}

impl Entry {
    /// Creates an entry from its parts.
    ///
    /// Fails with [`Error::MalformedEntry`] when the identifier or the title is empty.
    pub fn new(
        identifier: impl Into<String>,
        title: impl Into<String>,
        links: Vec<Link>,
    ) -> Result<Self> {
        let identifier = identifier.into();
        let title = title.into();
        if identifier.trim().is_empty() {
            return Err(Error::MalformedEntry {
                identifier: None,
                reason: "missing identifier".into(),
            });
        }
        if title.trim().is_empty() {
            return Err(Error::MalformedEntry {
                identifier: Some(identifier),
                reason: "missing title".into(),
            });
        }
        Ok(Self {
            identifier,
            title,
            links,
            updated: None,
            authors: Vec::new(),
            summary: None,
        })
    }

    /// Builds an entry from an `<entry>` element.
    ///
    /// Links keep their document order. Links without a target are ignored.
    pub fn from_xml(element: &XmlElement) -> Result<Self> {
        let identifier = element.child_text("id").unwrap_or_default().trim();
        let title = element.child_text("title").unwrap_or_default().trim();
        let links = element.children_named("link").filter_map(Link::from_xml).collect();

        let mut entry = Entry::new(identifier, title, links)?;
        entry.updated = element.child_text("updated").and_then(parse_timestamp);
        entry.authors = element
            .children_named("author")
            .filter_map(|a| a.child_text("name"))
            .map(|n| n.trim().to_string())
            .collect();
        entry.summary = element
            .child_text("summary")
            .or_else(|| element.child_text("content"))
            .map(String::from);
        Ok(entry)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Every link of the entry, in document order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Links that offer a way to obtain the book, in document order.
    pub fn acquisition_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|l| l.relation().is_acquisition())
    }

    /// Whether the entry offers at least one acquisition link.
    pub fn has_acquisition(&self) -> bool {
        self.acquisition_links().next().is_some()
    }

    /// The group this entry is filed under, if any.
    pub fn group_link(&self) -> Option<&Link> {
        self.links.iter().find(|l| l.relation() == &Relation::Group)
    }

    /// The first link that is neither artwork nor a group marker.
    pub fn primary_link(&self) -> Option<&Link> {
        self.links
            .iter()
            .find(|l| !l.relation().is_image() && l.relation() != &Relation::Group)
    }

    /// Whether this entry stands for another feed rather than a book.
    pub fn is_catalog_reference(&self) -> bool {
        !self.has_acquisition() && self.primary_link().is_some_and(Link::is_catalog)
    }
}

pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_element() -> XmlElement {
        XmlElement::new("entry")
            .with_child(XmlElement::new("id").with_text("urn:book:1"))
            .with_child(XmlElement::new("title").with_text("Moby Dick"))
            .with_child(XmlElement::new("updated").with_text("2014-03-01T10:00:00Z"))
            .with_child(
                XmlElement::new("author").with_child(XmlElement::new("name").with_text("Melville")),
            )
            .with_child(
                XmlElement::new("link")
                    .with_attribute("rel", "http://opds-spec.org/image/thumbnail")
                    .with_attribute("href", "/cover.jpg"),
            )
            .with_child(
                XmlElement::new("link")
                    .with_attribute("rel", "http://opds-spec.org/acquisition/borrow")
                    .with_attribute("href", "/borrow/1")
                    .with_attribute("type", "application/epub+zip"),
            )
            .with_child(
                XmlElement::new("link")
                    .with_attribute("rel", "http://example.com/custom")
                    .with_attribute("href", "/custom"),
            )
    }

    #[test]
    fn test_entry_from_xml() {
        let entry = Entry::from_xml(&entry_element()).unwrap();
        assert_eq!(entry.identifier(), "urn:book:1");
        assert_eq!(entry.title(), "Moby Dick");
        assert_eq!(entry.authors(), &["Melville".to_string()]);
        assert_eq!(entry.links().len(), 3);
        assert_eq!(entry.acquisition_links().count(), 1);
        assert_eq!(entry.primary_link().unwrap().href(), "/borrow/1");
        assert!(entry.group_link().is_none());
        assert!(entry.updated().is_some());
        assert!(!entry.is_catalog_reference());
    }

    #[test]
    fn test_unknown_relation_is_kept_in_order() {
        let entry = Entry::from_xml(&entry_element()).unwrap();
        assert_eq!(
            entry.links()[2].relation(),
            &Relation::Other("http://example.com/custom".into())
        );
    }

    #[test]
    fn test_missing_identifier_is_malformed() {
        let element =
            XmlElement::new("entry").with_child(XmlElement::new("title").with_text("No id"));
        let err = Entry::from_xml(&element).unwrap_err();
        assert!(matches!(err, Error::MalformedEntry { identifier: None, .. }));
    }

    #[test]
    fn test_missing_title_is_malformed() {
        let element = XmlElement::new("entry").with_child(XmlElement::new("id").with_text("x"));
        let err = Entry::from_xml(&element).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedEntry { identifier: Some(ref id), .. } if id == "x"
        ));
    }

    #[test]
    fn test_entry_without_links_is_valid() {
        let entry = Entry::new("urn:x", "Title", Vec::new()).unwrap();
        assert!(!entry.has_acquisition());
        assert!(entry.primary_link().is_none());
    }

    #[test]
    fn test_bad_timestamp_is_ignored() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2020-01-01T00:00:00+02:00").is_some());
    }
}
