//! Verified token claims.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The decoded payload of a verified bearer token.
///
/// Claims are kept as a free-form JSON object; nothing beyond "it is an
/// object" is assumed about their shape.
///
/// # Example
///
/// ```
/// use heron_core::Claims;
/// use serde_json::json;
///
/// let claims = Claims::try_from(json!({ "sub": "user-1", "role": "admin" })).unwrap();
/// assert_eq!(claims.get("sub"), Some(&json!("user-1")));
/// assert_eq!(claims.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Creates an empty claim set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a single claim.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns the subject (`sub`) claim if it is a string.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// Inserts a claim, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    /// Returns the claims as a JSON map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the claims as a JSON object value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Claims {
    type Error = Value;

    /// Fails, handing the value back, unless it is a JSON object.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_try_from_rejects_non_objects() {
        assert!(Claims::try_from(json!("sub")).is_err());
        assert!(Claims::try_from(json!([1, 2])).is_err());
    }

    #[test]
    fn test_subject() {
        let claims = Claims::try_from(json!({ "sub": "abc" })).unwrap();
        assert_eq!(claims.subject(), Some("abc"));

        let claims = Claims::try_from(json!({ "sub": 7 })).unwrap();
        assert_eq!(claims.subject(), None);
    }

    #[test]
    fn test_to_value_round_trips_object() {
        let mut claims = Claims::new();
        claims.insert("role", json!("admin"));
        assert_eq!(claims.to_value(), json!({ "role": "admin" }));
    }
}
