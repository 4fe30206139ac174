//! The feed model and its classification.
//!
//! A [`Feed`] is built once from a parsed document and never changes
//! afterwards. Its [`FeedType`] is computed during construction by
//! [`classify`] and cached on the value.

use super::entry::{parse_timestamp, Entry};
use super::link::{Link, Relation};
use crate::error::{Error, Result};
use crate::xml::XmlElement;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// The shape of a feed, which decides how a client renders and pages it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedType {
    /// The document is not a feed.
    Invalid,
    /// A feed with nothing in it.
    Empty,
    /// Books filed under named groups.
    AcquisitionGrouped,
    /// A flat list of books.
    AcquisitionUngrouped,
    /// Entries that lead to other feeds.
    Navigation,
}

/// Entries that share a group link, in order of first appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    /// Group name, taken from the link title (or its target when untitled).
    pub title: String,
    /// The feed listing the whole group.
    pub href: String,
    pub entries: Vec<&'a Entry>,
}

/// A parsed catalog feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Feed {
    identifier: String,
    title: String,
    updated: Option<DateTime<Utc>>,
    entries: Vec<Entry>,
    links: Vec<Link>,
    feed_type: FeedType,
    skipped_entries: usize,
}

impl Feed {
    /// Parses raw bytes into a feed.
    ///
    /// Never fails: a document that cannot be read is an
    /// [`FeedType::Invalid`] feed with no entries.
    pub fn from_bytes(bytes: &[u8]) -> Feed {
        match XmlElement::parse(bytes) {
            Ok(root) => Feed::from_xml(&root),
            Err(e) => {
                warn!("Unreadable feed document: {}", e);
                Feed::invalid()
            }
        }
    }

    /// Like [`Feed::from_bytes`], but reports an invalid document as an error.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Feed> {
        let root = XmlElement::parse(bytes)?;
        let feed = Feed::from_xml(&root);
        match feed.feed_type {
            FeedType::Invalid => Err(Error::InvalidFeed(format!(
                "expected a <feed> root element, found <{}>",
                root.name()
            ))),
            _ => Ok(feed),
        }
    }

    /// Builds a feed from an already parsed document.
    ///
    /// Entries lacking an identifier or a title are skipped; the rest of the
    /// feed stays usable.
    pub fn from_xml(root: &XmlElement) -> Feed {
        if root.name() != "feed" {
            debug!("Root element <{}> is not a feed", root.name());
            return Feed::invalid();
        }

        let mut entries = Vec::new();
        let mut skipped_entries = 0;
        for element in root.children_named("entry") {
            match Entry::from_xml(element) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!("Skipping entry: {}", e);
                    skipped_entries += 1;
                }
            }
        }

        let feed_type = classify(&entries);
        debug!(
            "Parsed feed with {} entries ({} skipped) as {:?}",
            entries.len(),
            skipped_entries,
            feed_type
        );

        Feed {
            identifier: root.child_text("id").unwrap_or_default().trim().to_string(),
            title: root.child_text("title").unwrap_or_default().trim().to_string(),
            updated: root.child_text("updated").and_then(parse_timestamp),
            entries,
            links: root.children_named("link").filter_map(Link::from_xml).collect(),
            feed_type,
            skipped_entries,
        }
    }

    fn invalid() -> Feed {
        Feed {
            identifier: String::new(),
            title: String::new(),
            updated: None,
            entries: Vec::new(),
            links: Vec::new(),
            feed_type: FeedType::Invalid,
            skipped_entries: 0,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Feed level links in document order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn feed_type(&self) -> FeedType {
        self.feed_type
    }

    /// How many malformed entries were dropped while parsing.
    pub fn skipped_entries(&self) -> usize {
        self.skipped_entries
    }

    /// The target of the `next` link, for paging.
    pub fn next_page(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.relation() == &Relation::Next)
            .map(Link::href)
    }

    /// Looks up an entry by identifier.
    pub fn entry(&self, identifier: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.identifier() == identifier)
    }

    /// Buckets the entries by group link.
    ///
    /// Entries without a group link are left out, so for an ungrouped feed
    /// the result is empty.
    pub fn groups(&self) -> Vec<Group<'_>> {
        let mut groups: Vec<Group<'_>> = Vec::new();
        for entry in &self.entries {
            let Some(link) = entry.group_link() else {
                continue;
            };
            match groups.iter_mut().find(|g| g.href == link.href()) {
                Some(group) => group.entries.push(entry),
                None => groups.push(Group {
                    title: link.title().unwrap_or(link.href()).to_string(),
                    href: link.href().to_string(),
                    entries: vec![entry],
                }),
            }
        }
        groups
    }
}

/// Decides the shape of a feed from its entries.
///
/// Rules, in order:
/// 1. no entries: [`FeedType::Empty`];
/// 2. every entry carries a group link: [`FeedType::AcquisitionGrouped`],
///    even when entries also carry acquisition links;
/// 3. no entry carries an acquisition link and at least one entry points at
///    another feed: [`FeedType::Navigation`];
/// 4. anything else: [`FeedType::AcquisitionUngrouped`].
///
/// Grouping is tested before navigation on purpose: a fully grouped feed
/// renders as groups even when its entries also look like feed references.
///
/// [`FeedType::Invalid`] is decided earlier, from the document root.
pub fn classify(entries: &[Entry]) -> FeedType {
    if entries.is_empty() {
        return FeedType::Empty;
    }
    if entries.iter().all(|e| e.group_link().is_some()) {
        return FeedType::AcquisitionGrouped;
    }
    let any_acquisition = entries.iter().any(Entry::has_acquisition);
    if !any_acquisition && entries.iter().any(Entry::is_catalog_reference) {
        return FeedType::Navigation;
    }
    FeedType::AcquisitionUngrouped
}
