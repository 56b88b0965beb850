//! Dynamic projections over nested values.
//!
//! A [`Projection`] wraps one [`Value`] and exposes field access, indexing,
//! iteration, and membership over it, re-wrapping nested containers on every
//! access so chained lookups read like a dot path regardless of whether the
//! data came from XML, JSON, or a hand-built value.

use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::flatten::flatten_payload;
use crate::value::{Mapping, Value};

/// Parse markup text and project the root element's payload.
///
/// The synthetic `{root_tag: ...}` layer is stripped: fields of the result
/// are the root element's children, not the root element itself. Unlike
/// [`Projection::from_raw`], malformed markup is an error on this path.
///
/// # Example
///
/// ```rust
/// let person = objectify::from_text("<Person><Age>36</Age></Person>").unwrap();
/// let age = person.field("Age").unwrap();
/// assert_eq!(age.as_i64(), Some(36));
/// ```
pub fn from_text(raw: &str) -> Result<Projection> {
    let root = objectify_xml::parse(raw)?;
    Ok(Projection::from_value(flatten_payload(&root)))
}

/// A dynamic view over one nested value.
///
/// Accessors hand back [`Projected`] values: containers are re-wrapped in a
/// fresh `Projection` on every access (lazily, never memoized), scalars pass
/// through unwrapped. Unknown field names are not errors; they yield `None`.
#[derive(Clone, PartialEq)]
pub struct Projection {
    value: Value,
}

/// The result of a projection accessor.
///
/// Containers come back as re-wrapped views, scalars as bare values. The
/// pass-through `field`/`get` methods let dot-path chains keep going without
/// unwrapping at every step.
#[derive(Debug, Clone, PartialEq)]
pub enum Projected {
    View(Projection),
    Scalar(Value),
}

/// A keyed or positional index into a projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Index {
    Key(String),
    Pos(usize),
}

impl From<&str> for Index {
    fn from(key: &str) -> Self {
        Index::Key(key.to_string())
    }
}

impl From<String> for Index {
    fn from(key: String) -> Self {
        Index::Key(key)
    }
}

impl From<usize> for Index {
    fn from(pos: usize) -> Self {
        Index::Pos(pos)
    }
}

impl Projection {
    /// Wrap a value directly.
    ///
    /// One shape is normalized on the way in: a sequence made up entirely of
    /// two-element sequences with string heads is treated as mapping entries
    /// and converted, so hand-built pair-list data behaves identically to
    /// the equivalent mapping. Normalization applies only here; values
    /// decoded from JSON or markup and values re-wrapped during access keep
    /// their decoded shape, so a JSON array of pairs stays a sequence.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: normalize(value.into()),
        }
    }

    fn from_value(value: Value) -> Self {
        Self { value }
    }

    /// Decode a raw payload, best effort.
    ///
    /// Tries JSON first, then XML (with the synthetic root key stripped, as
    /// in [`from_text`]), and finally falls back to wrapping the input as an
    /// opaque string scalar. This never fails: malformed input degrades to
    /// an inert wrapped value with no field access rather than an error.
    pub fn from_raw(raw: &str) -> Self {
        match decode_json(raw) {
            Ok(value) => return Projection::from_value(value),
            Err(err) => debug!(error = %err, "payload is not JSON, trying XML"),
        }
        match decode_markup(raw) {
            Ok(value) => return Projection::from_value(value),
            Err(err) => debug!(error = %err, "payload is not XML, keeping it as an opaque scalar"),
        }
        Projection::from_value(Value::from(raw))
    }

    /// The wrapped value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Unwrap into the underlying value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Look up a field by name.
    ///
    /// Returns `Some` only when the underlying value is a mapping containing
    /// the name. Anything else (a scalar, a sequence, an absent key) yields
    /// `None` rather than an error, so "maybe this response has this field"
    /// reads naturally. The flip side is that a typo also yields `None`; use
    /// [`Projection::get`] when a miss should be diagnosable.
    pub fn field(&self, name: &str) -> Option<Projected> {
        match &self.value {
            Value::Mapping(map) => map.get(name).map(|v| Projected::wrap(v.clone())),
            _ => None,
        }
    }

    /// Look up by key or position.
    ///
    /// A value that supports no indexing at all (a scalar, or a sequence
    /// given a string key) yields `Ok(None)`. An invalid index into a
    /// container that does support indexing is an error: a missing mapping
    /// key or an out-of-range sequence position propagates.
    pub fn get(&self, index: impl Into<Index>) -> Result<Option<Projected>> {
        let index = index.into();
        Ok(lookup(&self.value, &index)?.map(|v| Projected::wrap(v.clone())))
    }

    /// Size of the underlying container; `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        match &self.value {
            Value::Mapping(map) => Some(map.len()),
            Value::Sequence(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Whether the underlying container is empty. Scalars are not containers
    /// and are never considered empty.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Membership test, delegated to the underlying value: key membership
    /// for mappings, element equality for sequences, substring containment
    /// for string scalars.
    pub fn contains(&self, key: &str) -> bool {
        match &self.value {
            Value::Mapping(map) => map.contains_key(key),
            Value::Sequence(items) => items.iter().any(|v| v.as_str() == Some(key)),
            Value::String(s) => s.contains(key),
            _ => false,
        }
    }

    /// Iterate over the underlying value.
    ///
    /// Mappings yield `(Some(key), value)` pairs in insertion order,
    /// sequences yield `(None, element)` in order, and scalars yield
    /// nothing. The iterator snapshots the container, so repeated calls
    /// produce identical output.
    pub fn iter(&self) -> Entries {
        let items: Vec<(Option<String>, Projected)> = match &self.value {
            Value::Mapping(map) => map
                .iter()
                .map(|(k, v)| (Some(k.clone()), Projected::wrap(v.clone())))
                .collect(),
            Value::Sequence(items) => items
                .iter()
                .map(|v| (None, Projected::wrap(v.clone())))
                .collect(),
            _ => Vec::new(),
        };
        Entries {
            inner: items.into_iter(),
        }
    }
}

// Debug lists mapping keys with coarse value types, sequence sizes, or the
// raw scalar, keeping dumps of deep API responses one line per view.
impl fmt::Debug for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::Mapping(map) => {
                write!(f, "<Projection#mapping")?;
                for (key, value) in map.iter() {
                    write!(f, " {}={}", key, value.type_name())?;
                }
                write!(f, ">")
            }
            Value::Sequence(items) => {
                write!(f, "<Projection#sequence elements:{}>", items.len())
            }
            scalar => write!(f, "{}", scalar),
        }
    }
}

impl Projected {
    // Re-wrapping never normalizes: nested values keep their decoded shape.
    fn wrap(value: Value) -> Self {
        if value.is_scalar() {
            Projected::Scalar(value)
        } else {
            Projected::View(Projection::from_value(value))
        }
    }

    /// The re-wrapped view, if this is a container.
    pub fn as_view(&self) -> Option<&Projection> {
        match self {
            Projected::View(view) => Some(view),
            Projected::Scalar(_) => None,
        }
    }

    /// The underlying value, container or scalar.
    pub fn as_value(&self) -> &Value {
        match self {
            Projected::View(view) => view.value(),
            Projected::Scalar(value) => value,
        }
    }

    /// The string content, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().as_str()
    }

    /// The integer content, if this is an integer scalar.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().as_i64()
    }

    /// Chained field access; `None` for scalars.
    pub fn field(&self, name: &str) -> Option<Projected> {
        self.as_view().and_then(|view| view.field(name))
    }

    /// Chained keyed/positional access; `Ok(None)` for scalars.
    pub fn get(&self, index: impl Into<Index>) -> Result<Option<Projected>> {
        match self.as_view() {
            Some(view) => view.get(index),
            None => Ok(None),
        }
    }

    /// Chained iteration; empty for scalars.
    pub fn iter(&self) -> Entries {
        match self.as_view() {
            Some(view) => view.iter(),
            None => Entries {
                inner: Vec::new().into_iter(),
            },
        }
    }
}

/// Snapshot iterator over a projection's entries.
pub struct Entries {
    inner: std::vec::IntoIter<(Option<String>, Projected)>,
}

impl Iterator for Entries {
    type Item = (Option<String>, Projected);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// The single dispatch point for keyed and positional access over the
/// mapping/sequence/scalar union.
///
/// `Ok(None)` means the value supports no such access at all; `Err` means
/// the container is indexable but the index is invalid for it.
fn lookup<'a>(value: &'a Value, index: &Index) -> Result<Option<&'a Value>> {
    match (value, index) {
        (Value::Mapping(map), Index::Key(key)) => match map.get(key) {
            Some(v) => Ok(Some(v)),
            None => Err(Error::KeyNotFound { key: key.clone() }),
        },
        // Mappings are keyed containers; a positional index is a missing key
        (Value::Mapping(_), Index::Pos(pos)) => Err(Error::KeyNotFound {
            key: pos.to_string(),
        }),
        (Value::Sequence(items), Index::Pos(pos)) => match items.get(*pos) {
            Some(v) => Ok(Some(v)),
            None => Err(Error::IndexOutOfRange {
                index: *pos,
                len: items.len(),
            }),
        },
        // Sequences have no keyed access; swallowed, not an error
        (Value::Sequence(_), Index::Key(_)) => Ok(None),
        // Scalars support no indexing at all
        _ => Ok(None),
    }
}

/// Convert a sequence of string-keyed pairs into mapping entries; leave
/// every other shape untouched.
fn normalize(value: Value) -> Value {
    let Value::Sequence(items) = value else {
        return value;
    };

    if !items.iter().all(is_string_keyed_pair) {
        return Value::Sequence(items);
    }

    // An all-pairs sequence (vacuously including the empty one) becomes the
    // equivalent mapping.
    let map: Mapping = items
        .into_iter()
        .map(|item| match item {
            Value::Sequence(mut pair) => {
                let value = pair.pop().unwrap_or(Value::Null);
                match pair.pop() {
                    Some(Value::String(key)) => (key, value),
                    _ => unreachable!("checked by is_string_keyed_pair"),
                }
            }
            _ => unreachable!("checked by is_string_keyed_pair"),
        })
        .collect();
    Value::Mapping(map)
}

fn is_string_keyed_pair(value: &Value) -> bool {
    match value {
        Value::Sequence(pair) => pair.len() == 2 && matches!(pair[0], Value::String(_)),
        _ => false,
    }
}

fn decode_json(raw: &str) -> std::result::Result<Value, serde_json::Error> {
    serde_json::from_str::<serde_json::Value>(raw).map(Value::from)
}

fn decode_markup(raw: &str) -> objectify_xml::Result<Value> {
    let root = objectify_xml::parse(raw)?;
    Ok(flatten_payload(&root))
}
