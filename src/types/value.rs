use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Values carried by rule arguments, field options and exported payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// An ordered mapping. Keys keep their insertion order.
    Map(Vec<(String, Value)>),
    /// A reference to another field of the same form, by name.
    Control(String),
}

impl Value {
    /// Build a [`Value::Map`] from key/value pairs, keeping their order.
    #[must_use]
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look up a key in a [`Value::Map`]. Returns `None` for any other variant.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Replace every [`Value::Control`] reference, at any depth, with the
    /// `{control: <name>}` object client-side scripts expect.
    #[must_use]
    pub fn resolve_controls(&self) -> Value {
        match self {
            Value::Control(name) => Value::map([("control", Value::String(name.clone()))]),
            Value::List(items) => Value::List(items.iter().map(Value::resolve_controls).collect()),
            Value::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.resolve_controls()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Names of all controls referenced by this value.
    pub(crate) fn collect_controls<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Value::Control(name) => out.push(name),
            Value::List(items) => items.iter().for_each(|v| v.collect_controls(out)),
            Value::Map(entries) => entries.iter().for_each(|(_, v)| v.collect_controls(out)),
            _ => {}
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Control(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("control", name)?;
                map.end()
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(", "))
            }
            Value::Map(entries) => {
                let parts: Vec<String> = entries.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Value::Control(name) => write!(f, "@{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_scalars() {
        assert_eq!(Value::from(42_i64), Value::Int(42));
        assert_eq!(Value::from(7_i32), Value::Int(7));
        assert_eq!(Value::from(2.5_f64), Value::Float(2.5));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("hello"), Value::String("hello".to_owned()));
    }

    #[test]
    fn from_vec() {
        assert_eq!(
            Value::from(vec![1_i64, 2]),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn display() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::String("hi".into()).to_string(), "hi");
        assert_eq!(Value::from(vec![3_i64, 8]).to_string(), "3, 8");
        assert_eq!(Value::Control("password".into()).to_string(), "@password");
    }

    #[test]
    fn map_keeps_insertion_order() {
        let map = Value::map([("z", 1_i64), ("a", 2_i64)]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn control_serializes_as_object() {
        let json = serde_json::to_string(&Value::Control("pass".into())).unwrap();
        assert_eq!(json, r#"{"control":"pass"}"#);
    }

    #[test]
    fn resolve_controls_nested() {
        let value = Value::List(vec![Value::Int(1), Value::Control("other".into())]);
        assert_eq!(
            value.resolve_controls(),
            Value::List(vec![
                Value::Int(1),
                Value::map([("control", "other")]),
            ])
        );
    }

    #[test]
    fn get_on_map() {
        let map = Value::map([("op", "filled")]);
        assert_eq!(map.get("op").and_then(Value::as_str), Some("filled"));
        assert_eq!(map.get("missing"), None);
        assert_eq!(Value::Int(1).get("op"), None);
    }
}
