//! Typed links found on feeds and entries.

use crate::xml::XmlElement;

use std::fmt;

const ACQUISITION: &str = "http://opds-spec.org/acquisition";
const BORROW: &str = "http://opds-spec.org/acquisition/borrow";
const BUY: &str = "http://opds-spec.org/acquisition/buy";
const OPEN_ACCESS: &str = "http://opds-spec.org/acquisition/open-access";
const SAMPLE: &str = "http://opds-spec.org/acquisition/sample";
const SUBSCRIBE: &str = "http://opds-spec.org/acquisition/subscribe";
const GROUP: &str = "http://opds-spec.org/group";
const IMAGE: &str = "http://opds-spec.org/image";
const THUMBNAIL: &str = "http://opds-spec.org/image/thumbnail";

/// The relation of a link to the document that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Generic acquisition, no further qualification.
    Acquisition,
    Borrow,
    Buy,
    OpenAccess,
    Sample,
    Subscribe,
    /// The entry belongs to the named group this link points at.
    Group,
    Image,
    Thumbnail,
    Related,
    SelfLink,
    Next,
    Start,
    Alternate,
    Subsection,
    /// Any relation not listed above, kept verbatim.
    Other(String),
}

impl Relation {
    /// Parses a `rel` attribute value. Unknown values are preserved.
    pub fn parse(rel: &str) -> Relation {
        match rel.trim() {
            ACQUISITION => Relation::Acquisition,
            BORROW => Relation::Borrow,
            BUY => Relation::Buy,
            OPEN_ACCESS => Relation::OpenAccess,
            SAMPLE => Relation::Sample,
            SUBSCRIBE => Relation::Subscribe,
            GROUP | "collection" => Relation::Group,
            IMAGE => Relation::Image,
            THUMBNAIL => Relation::Thumbnail,
            "related" => Relation::Related,
            "self" => Relation::SelfLink,
            "next" => Relation::Next,
            "start" => Relation::Start,
            "alternate" => Relation::Alternate,
            "subsection" => Relation::Subsection,
            other => Relation::Other(other.to_string()),
        }
    }

    /// Whether the relation designates a way of obtaining the book.
    pub fn is_acquisition(&self) -> bool {
        matches!(
            self,
            Relation::Acquisition
                | Relation::Borrow
                | Relation::Buy
                | Relation::OpenAccess
                | Relation::Sample
                | Relation::Subscribe
        )
    }

    /// Whether the relation points at artwork.
    pub fn is_image(&self) -> bool {
        matches!(self, Relation::Image | Relation::Thumbnail)
    }

    /// The `rel` string this relation was parsed from.
    pub fn as_str(&self) -> &str {
        match self {
            Relation::Acquisition => ACQUISITION,
            Relation::Borrow => BORROW,
            Relation::Buy => BUY,
            Relation::OpenAccess => OPEN_ACCESS,
            Relation::Sample => SAMPLE,
            Relation::Subscribe => SUBSCRIBE,
            Relation::Group => GROUP,
            Relation::Image => IMAGE,
            Relation::Thumbnail => THUMBNAIL,
            Relation::Related => "related",
            Relation::SelfLink => "self",
            Relation::Next => "next",
            Relation::Start => "start",
            Relation::Alternate => "alternate",
            Relation::Subsection => "subsection",
            Relation::Other(rel) => rel,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A link on a feed or an entry. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    relation: Relation,
    href: String,
    media_type: Option<String>,
    title: Option<String>,
}

impl Link {
    /// Creates a new [`Link`].
    pub fn new(relation: Relation, href: impl Into<String>, media_type: Option<String>) -> Self {
        Self {
            relation,
            href: href.into(),
            media_type,
            title: None,
        }
    }

    /// Reads a `<link>` element. Returns `None` when there is no `href`.
    ///
    /// A missing `rel` means `alternate`, as in Atom.
    pub fn from_xml(element: &XmlElement) -> Option<Link> {
        let href = element.attribute("href").filter(|h| !h.trim().is_empty())?;
        let relation = element
            .attribute("rel")
            .map(Relation::parse)
            .unwrap_or(Relation::Alternate);
        Some(Link {
            relation,
            href: href.trim().to_string(),
            media_type: element.attribute("type").map(String::from),
            title: element.attribute("title").map(String::from),
        })
    }

    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    /// Target URI, possibly relative to the feed it came from.
    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// Human readable title; group links carry the group name here.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Whether the target is itself a catalog feed.
    ///
    /// `subsection` and `start` links always are; any other link is when it
    /// announces an Atom media type.
    pub fn is_catalog(&self) -> bool {
        matches!(self.relation, Relation::Subsection | Relation::Start)
            || self
                .media_type
                .as_deref()
                .is_some_and(|t| t.trim_start().starts_with("application/atom+xml"))
    }
}
