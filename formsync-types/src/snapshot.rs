//! Form snapshots and the option shape used by multi-select widgets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The value of every control of a form at one instant, in field order.
///
/// Produced on every edit and handed to the save operation as a whole.
/// Field order follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSnapshot(Map<String, Value>);

impl FormSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builds a snapshot from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> crate::Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(crate::Error::NotAnObject("null")),
            Value::Bool(_) => Err(crate::Error::NotAnObject("bool")),
            Value::Number(_) => Err(crate::Error::NotAnObject("number")),
            Value::String(_) => Err(crate::Error::NotAnObject("string")),
            Value::Array(_) => Err(crate::Error::NotAnObject("array")),
        }
    }

    /// Parses a snapshot from a JSON object string.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Returns the value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Sets a field, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Builder form of [`FormSnapshot::set`].
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Copies every field of `other` over this snapshot.
    pub fn merge(&mut self, other: FormSnapshot) {
        for (field, value) in other.0 {
            self.0.insert(field, value);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Applies `f` to every value, keeping field order.
    #[must_use]
    pub fn map_values(self, mut f: impl FnMut(Value) -> Value) -> Self {
        Self(self.0.into_iter().map(|(k, v)| (k, f(v))).collect())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for FormSnapshot {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FormSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A selectable option as rendered by a multi-select widget.
///
/// The widget binds the whole option so it can display `string_value`;
/// the backend only wants `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOption {
    /// Canonical identifier persisted by the backend.
    pub key: String,
    /// Label shown to the user.
    #[serde(rename = "stringValue")]
    pub string_value: String,
}

impl EnumOption {
    pub fn new(key: impl Into<String>, string_value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            string_value: string_value.into(),
        }
    }

    /// Reads an option from its JSON shape: an object with string `key` and
    /// `stringValue` members. Extra members are ignored.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let key = obj.get("key")?.as_str()?;
        let string_value = obj.get("stringValue")?.as_str()?;
        Some(Self::new(key, string_value))
    }

    /// JSON shape of this option.
    pub fn to_value(&self) -> Value {
        serde_json::json!({ "key": self.key, "stringValue": self.string_value })
    }
}
