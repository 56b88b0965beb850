//! # objectify
//!
//! Dot-path access to XML and JSON API responses without per-schema parsers.
//!
//! An XML document (or any JSON-like nested structure) is flattened into a
//! nested [`Value`], where repeated sibling tags coalesce into sequences and
//! digit-only text coerces to integers, then wrapped in a [`Projection`]
//! that supports field access, indexing, iteration, and membership,
//! re-wrapping nested containers on every access.
//!
//! ## Example
//!
//! ```rust
//! let books = objectify::from_text(
//!     "<Books><Items>\
//!        <Item><ISBN>0321558235</ISBN></Item>\
//!        <Item><ISBN>9780321558237</ISBN></Item>\
//!      </Items></Books>",
//! )
//! .unwrap();
//!
//! let items = books.field("Items").unwrap().field("Item").unwrap();
//! let first = items.get(0).unwrap().unwrap();
//! assert_eq!(first.field("ISBN").unwrap().as_i64(), Some(321558235));
//! ```
//!
//! Two entry points with different failure postures:
//! - [`from_text`] parses markup and propagates parse errors.
//! - [`Projection::from_raw`] decodes best effort (JSON, then XML, then an
//!   opaque scalar) and never fails: malformed input degrades to an inert
//!   wrapped value instead of crashing the caller. Consumers expecting
//!   fail-fast behavior should prefer [`from_text`].

pub mod error;
pub mod flatten;
pub mod projection;
pub mod value;

// Re-export main types
pub use error::{Error, Result};
pub use flatten::{flatten, flatten_payload};
pub use objectify_xml::{Element, StringElement, parse};
pub use projection::{Entries, Index, Projected, Projection, from_text};
pub use value::{Mapping, Value, try_parse_int};
