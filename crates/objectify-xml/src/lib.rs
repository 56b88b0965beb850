//! Mutable element trees and XML parsing for objectify.
//!
//! This crate provides the element graph that backs objectify's dynamic
//! projection: a tagged tree node with an immutable text payload, ordered
//! children, and a non-owning parent back-reference. It wraps [`quick-xml`]
//! to parse markup into such trees.
//!
//! # Overview
//!
//! The main types are:
//! - [`Element`]: a shared handle to a mutable tagged tree node
//! - [`StringElement`]: a string-typed leaf with a quoting debug representation
//! - [`Payload`]: runtime-typed content for fallible element construction
//!
//! # Example
//!
//! ```rust
//! use objectify_xml::{Element, parse};
//!
//! // Build a tree by hand...
//! let person = Element::new("Person");
//! let name = Element::with_text("Name", "Marianne");
//! person.append(&name);
//! assert!(name.parent().unwrap().same_node(&person));
//!
//! // ...or parse one from markup.
//! let root = parse("<Person><Name>Marianne</Name></Person>").unwrap();
//! assert_eq!(root.children()[0].text(), Some("Marianne".to_string()));
//! ```
//!
//! Trees are build-once-then-read: after the append phase only the tag is
//! reassignable. Handles are reference-counted and single-threaded.

pub mod element;
pub mod error;
pub mod parser;

// Re-export main types
pub use element::{Element, Payload, StringElement};
pub use error::{Error, Result};
pub use parser::parse;
