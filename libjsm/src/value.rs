//! JSM value representation.

use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::fmt;

/// Insertion-ordered map used for mappings.
pub type Map = IndexMap<String, Value>;

/// A JSM value.
#[derive(Clone, PartialEq, Eq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Arbitrary-precision integer.
    Integer(BigInt),
    /// UTF-8 string, exactly as it appeared between the quotes.
    String(String),
    /// Ordered list of values.
    Sequence(Vec<Value>),
    /// Key-value map. Keys keep the order of their first insertion.
    Mapping(Map),
}

impl Value {
    /// Returns `true` if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean value if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns a reference to the integer if this is an `Integer`.
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Value::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the integer as an `i64` if it is one and fits.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(ToPrimitive::to_i64)
    }

    /// Returns a reference to the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to the elements if this is a `Sequence`.
    pub fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns a reference to the map if this is a `Mapping`.
    pub fn as_mapping(&self) -> Option<&Map> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up `key` if this is a `Mapping`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Short name of the value's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Sequence(items) => f.debug_list().entries(items).finish(),
            Value::Mapping(map) => f.debug_map().entries(map).finish(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::Integer(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(BigInt::from(n))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Mapping(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_rendering() {
        let mut map = Map::new();
        map.insert("b".to_string(), Value::from(vec![Value::Null, true.into()]));
        map.insert("a".to_string(), Value::from(-3i64));
        map.insert("c".to_string(), Value::from("x"));
        assert_eq!(
            format!("{:?}", Value::from(map)),
            r#"{"b": [null, true], "a": -3, "c": "x"}"#
        );
    }

    #[test]
    fn test_accessors() {
        let big: BigInt = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(Value::from(big.clone()).as_integer(), Some(&big));
        assert_eq!(Value::from(big).as_i64(), None);
        assert_eq!(Value::from(-7i64).as_i64(), Some(-7));
        assert_eq!(Value::from("s").as_str(), Some("s"));
        assert_eq!(Value::from(false).as_bool(), Some(false));
        assert!(Value::Null.is_null());
        assert_eq!(Value::Null.as_str(), None);
        assert_eq!(Value::Sequence(Vec::new()).kind_name(), "sequence");
    }

    #[test]
    fn test_get() {
        let mut map = Map::new();
        map.insert("k".to_string(), Value::Null);
        let value = Value::from(map);
        assert_eq!(value.get("k"), Some(&Value::Null));
        assert_eq!(value.get("missing"), None);
        assert_eq!(Value::Sequence(Vec::new()).get("k"), None);
    }
}
