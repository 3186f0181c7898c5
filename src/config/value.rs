//! Values produced by reading an option.

use serde_json::Value as Json;

use super::node::Configuration;
use crate::error::Result;

/// A resolved option value.
///
/// Literals are carried as JSON values. A JSON `null` never appears as a
/// literal: every conversion maps it to [`Value::Absent`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Nothing set and nothing declared, or an explicit nil.
    #[default]
    Absent,
    /// A plain value. Objects are treated as partial-override mappings by `set`.
    Literal(Json),
    /// A nested configuration.
    Node(Configuration),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent | Value::Literal(Json::Null))
    }

    /// True for a plain JSON object (not a nested configuration).
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Literal(Json::Object(_)))
    }

    pub fn as_literal(&self) -> Option<&Json> {
        match self {
            Value::Literal(json) => Some(json),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Configuration> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<Configuration> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_literal().and_then(Json::as_u64)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_literal().and_then(Json::as_i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_literal().and_then(Json::as_f64)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_literal().and_then(Json::as_str)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_literal().and_then(Json::as_bool)
    }

    /// Convert to JSON, resolving nested configurations (and their deferred
    /// values) recursively.
    pub fn to_json(&self) -> Result<Json> {
        match self {
            Value::Absent => Ok(Json::Null),
            Value::Literal(json) => Ok(json.clone()),
            Value::Node(node) => node.to_json(),
        }
    }
}

impl PartialEq<Json> for Value {
    fn eq(&self, other: &Json) -> bool {
        match self {
            Value::Absent => other.is_null(),
            Value::Literal(json) => json == other,
            Value::Node(_) => false,
        }
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        if json.is_null() {
            Value::Absent
        } else {
            Value::Literal(json)
        }
    }
}

impl From<Configuration> for Value {
    fn from(node: Configuration) -> Self {
        Value::Node(node)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Absent, Into::into)
    }
}

macro_rules! literal_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::from(Json::from(value))
                }
            }
        )*
    };
}

literal_from!(bool, i32, i64, u32, u64, f64, &str, String);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_is_absent() {
        assert_eq!(Value::from(json!(null)), Value::Absent);
        assert!(Value::from(None::<i64>).is_absent());
    }

    #[test]
    fn test_typed_reads() {
        assert_eq!(Value::from(1024).as_u64(), Some(1024));
        assert_eq!(Value::from(-3).as_i64(), Some(-3));
        assert_eq!(Value::from("face").as_str(), Some("face"));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(29.97).as_f64(), Some(29.97));
        assert_eq!(Value::Absent.as_str(), None);
    }

    #[test]
    fn test_mapping_detection() {
        assert!(Value::from(json!({"bitrate": 2000})).is_mapping());
        assert!(!Value::from(json!([1, 2])).is_mapping());
        assert!(!Value::Node(Configuration::new()).is_mapping());
    }

    #[test]
    fn test_compare_with_json() {
        assert_eq!(Value::from(30), json!(30));
        assert_eq!(Value::Absent, json!(null));
        assert_ne!(Value::Node(Configuration::new()), json!({}));
    }
}
