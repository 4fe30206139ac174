//! XML document primitive.
//!
//! Turns raw bytes into a navigable tree of named elements with attributes,
//! text and children. The feed model consumes this tree; it never touches the
//! tokenizer directly.
//!
//! # Examples
//!
//! ```rust
//! use opds_acquire::xml::XmlElement;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let root = XmlElement::parse(br#"<feed><title>Books</title></feed>"#)?;
//! assert_eq!(root.name(), "feed");
//! assert_eq!(root.child_text("title"), Some("Books"));
//! # Ok(())
//! # }
//! ```

pub mod element;

pub use element::XmlElement;
