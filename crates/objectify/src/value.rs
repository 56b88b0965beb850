//! The nested value model projections are built over.

use std::fmt;

use hashlink::LinkedHashMap;

/// An insertion-ordered mapping from tag or key names to values.
pub type Mapping = LinkedHashMap<String, Value>;

/// A nested value: a mapping, a sequence, or a scalar.
///
/// Mappings are insertion-ordered so iteration over a projection reproduces
/// the order keys first appeared in the source document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Mapping(Mapping),
    Sequence(Vec<Value>),
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Value {
    /// Coarse runtime type name, used in debug output and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Mapping(_) => "mapping",
            Value::Sequence(_) => "sequence",
            Value::String(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Null => "null",
        }
    }

    /// Whether this value is a scalar (neither a mapping nor a sequence).
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Mapping(_) | Value::Sequence(_))
    }

    /// The string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer content, if this is an integer value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Mapping(map) => write!(f, "mapping({})", map.len()),
            Value::Sequence(items) => write!(f, "sequence({})", items.len()),
            Value::String(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Sequence(value)
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Value::Mapping(value)
    }
}

impl From<Vec<(String, Value)>> for Value {
    fn from(entries: Vec<(String, Value)>) -> Self {
        Value::Mapping(entries.into_iter().collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Parse `text` as an integer if the whole (trimmed) string is one.
///
/// This is the flattener's coercion step kept as an explicit try-parse so
/// the merge logic stays free of error handling.
pub fn try_parse_int(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_parse_int_digits() {
        assert_eq!(try_parse_int("42"), Some(42));
        assert_eq!(try_parse_int("0321558235"), Some(321558235));
        assert_eq!(try_parse_int("-7"), Some(-7));
        assert_eq!(try_parse_int(" 42 "), Some(42));
    }

    #[test]
    fn test_try_parse_int_rejects_non_integers() {
        assert_eq!(try_parse_int("42a"), None);
        assert_eq!(try_parse_int("4.2"), None);
        assert_eq!(try_parse_int("Marianne"), None);
        assert_eq!(try_parse_int(""), None);
        assert_eq!(try_parse_int("   "), None);
    }

    #[test]
    fn test_from_json_value() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"name": "Marianne", "age": 36, "tags": ["a", null]}"#)
                .unwrap();
        let value = Value::from(json);

        let Value::Mapping(map) = value else {
            panic!("expected mapping");
        };
        assert_eq!(map.get("name"), Some(&Value::String("Marianne".into())));
        assert_eq!(map.get("age"), Some(&Value::Int(36)));
        assert_eq!(
            map.get("tags"),
            Some(&Value::Sequence(vec![
                Value::String("a".into()),
                Value::Null
            ]))
        );
    }

    #[test]
    fn test_from_json_float() {
        let json: serde_json::Value = serde_json::from_str("4.5").unwrap();
        assert_eq!(Value::from(json), Value::Float(4.5));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Int(1).type_name(), "int");
        assert_eq!(Value::Mapping(Mapping::new()).type_name(), "mapping");
        assert_eq!(Value::Sequence(vec![]).type_name(), "sequence");
        assert!(Value::Bool(true).is_scalar());
        assert!(!Value::Sequence(vec![]).is_scalar());
    }
}
