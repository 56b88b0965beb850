//! Flattening element trees into nested values.

use hashlink::linked_hash_map::Entry;
use objectify_xml::Element;

use crate::value::{Mapping, Value, try_parse_int};

/// Flatten an element tree into a single-entry mapping `{tag: payload}`.
///
/// Childless elements become scalars: text that parses as an integer is
/// coerced, other text stays a string, and missing text becomes null.
/// Elements with children become mappings of their children's tags, where a
/// tag that repeats among siblings collapses into a sequence in document
/// order.
///
/// An element with both children and text keeps only the children: text is
/// consulted for childless leaves only. Mixed content is lossy here, a known
/// and intentional limitation kept for output compatibility.
pub fn flatten(element: &Element) -> Value {
    let mut map = Mapping::new();
    map.insert(element.tag(), flatten_payload(element));
    Value::Mapping(map)
}

/// Flatten an element into its payload alone, without the enclosing
/// `{tag: ...}` entry.
pub fn flatten_payload(element: &Element) -> Value {
    let children = element.children();
    if children.is_empty() {
        return coerce_text(element.text());
    }

    // Merge data from child nodes into one mapping
    let mut merged = Mapping::new();
    for child in &children {
        merge_entry(&mut merged, child.tag(), flatten_payload(child));
    }

    Value::Mapping(merged)
}

/// Insert a child's value under its tag, promoting repeated tags into
/// sequences: the second occurrence collapses both values into a
/// two-element sequence, later occurrences append.
fn merge_entry(map: &mut Mapping, key: String, value: Value) {
    match map.entry(key) {
        Entry::Occupied(mut occupied) => match occupied.get_mut() {
            Value::Sequence(items) => items.push(value),
            existing => {
                let first = std::mem::replace(existing, Value::Null);
                *existing = Value::Sequence(vec![first, value]);
            }
        },
        Entry::Vacant(vacant) => {
            vacant.insert(value);
        }
    }
}

fn coerce_text(text: Option<String>) -> Value {
    match text {
        None => Value::Null,
        Some(text) => match try_parse_int(&text) {
            Some(n) => Value::Int(n),
            None => Value::String(text),
        },
    }
}
