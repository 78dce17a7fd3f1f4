//! Desired and tracked state for one resource instance
//!
//! [`ResourceData`] is the handle a lifecycle operation works on. Reads go to
//! the desired state the caller declared; writes go to the tracked state the
//! resource observed remotely. Both are checked against the [`Schema`].

use crate::error::DataError;
use crate::schema::{FieldType, Schema};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A field value
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    String(String),
}

impl Value {
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Bool(_) => FieldType::Bool,
            Self::Int(_) => FieldType::Int,
            Self::String(_) => FieldType::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

/// Sink for tracked-state writes
///
/// Each call is one independent assignment that may be rejected.
pub trait StateWriter {
    fn set(&mut self, key: &str, value: Value) -> Result<(), DataError>;
}

/// State handle for one resource instance
#[derive(Clone)]
pub struct ResourceData {
    schema: Schema,
    desired: BTreeMap<String, Value>,
    tracked: BTreeMap<String, Value>,
    frozen: BTreeSet<String>,
}

impl ResourceData {
    /// Empty handle for a schema
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            desired: BTreeMap::new(),
            tracked: BTreeMap::new(),
            frozen: BTreeSet::new(),
        }
    }

    /// Build a handle from declared values
    ///
    /// Rejects unknown fields, computed fields, and type mismatches.
    /// Required fields are checked separately by [`ResourceData::validate`].
    pub fn from_desired<I, K>(schema: Schema, values: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut data = Self::new(schema);
        for (key, value) in values {
            data.declare(key, value)?;
        }
        Ok(data)
    }

    /// Declare one desired value
    pub fn declare(&mut self, key: impl Into<String>, value: Value) -> Result<(), DataError> {
        let key = key.into();
        let field = self
            .schema
            .field(&key)
            .ok_or_else(|| DataError::UnknownField(key.clone()))?;

        if field.computed {
            return Err(DataError::Computed(key));
        }
        check_type(&key, field.field_type, &value)?;

        self.desired.insert(key, value);
        Ok(())
    }

    /// Check that every required field has a desired value
    pub fn validate(&self) -> Result<(), DataError> {
        match self
            .schema
            .required_fields()
            .find(|f| !self.desired.contains_key(f.name))
        {
            Some(missing) => Err(DataError::MissingRequired(missing.name.to_string())),
            None => Ok(()),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Desired value, falling back to the schema default, then to the zero
    /// value for optional fields
    pub fn get(&self, key: &str) -> Result<Value, DataError> {
        let field = self
            .schema
            .field(key)
            .ok_or_else(|| DataError::UnknownField(key.to_string()))?;

        if let Some(value) = self.desired.get(key) {
            return Ok(value.clone());
        }
        if let Some(default) = &field.default {
            return Ok(default.clone());
        }
        if field.required {
            return Err(DataError::MissingRequired(key.to_string()));
        }
        Ok(field.field_type.zero())
    }

    pub fn get_str(&self, key: &str) -> Result<String, DataError> {
        match self.get(key)? {
            Value::String(s) => Ok(s),
            other => Err(mismatch(key, FieldType::String, &other)),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, DataError> {
        match self.get(key)? {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch(key, FieldType::Bool, &other)),
        }
    }

    pub fn get_int(&self, key: &str) -> Result<i64, DataError> {
        match self.get(key)? {
            Value::Int(i) => Ok(i),
            other => Err(mismatch(key, FieldType::Int, &other)),
        }
    }

    /// Last tracked value for a field, if any
    pub fn tracked(&self, key: &str) -> Option<&Value> {
        self.tracked.get(key)
    }

    /// Last tracked string value, ignoring empty strings
    pub fn tracked_str(&self, key: &str) -> Option<&str> {
        self.tracked
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Whether any field has been tracked yet
    pub fn has_tracked(&self) -> bool {
        !self.tracked.is_empty()
    }

    /// Make a field reject further writes
    pub fn freeze(&mut self, key: impl Into<String>) {
        self.frozen.insert(key.into());
    }
}

impl StateWriter for ResourceData {
    fn set(&mut self, key: &str, value: Value) -> Result<(), DataError> {
        let field = self
            .schema
            .field(key)
            .ok_or_else(|| DataError::UnknownField(key.to_string()))?;

        if self.frozen.contains(key) {
            return Err(DataError::Frozen(key.to_string()));
        }
        check_type(key, field.field_type, &value)?;

        self.tracked.insert(key.to_string(), value);
        Ok(())
    }
}

/// Serializes the tracked state, omitting sensitive fields
impl Serialize for ResourceData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let visible: Vec<_> = self
            .tracked
            .iter()
            .filter(|(k, _)| !self.schema.is_sensitive(k))
            .collect();

        let mut map = serializer.serialize_map(Some(visible.len()))?;
        for (key, value) in visible {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Debug for ResourceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desired: BTreeMap<_, _> = self
            .desired
            .iter()
            .map(|(k, v)| {
                if self.schema.is_sensitive(k) {
                    (k.as_str(), "<sensitive>".to_string())
                } else {
                    (k.as_str(), format!("{v:?}"))
                }
            })
            .collect();

        f.debug_struct("ResourceData")
            .field("desired", &desired)
            .field("tracked", &self.tracked)
            .finish_non_exhaustive()
    }
}

fn check_type(key: &str, expected: FieldType, value: &Value) -> Result<(), DataError> {
    if value.field_type() == expected {
        Ok(())
    } else {
        Err(mismatch(key, expected, value))
    }
}

fn mismatch(key: &str, expected: FieldType, found: &Value) -> DataError {
    DataError::TypeMismatch {
        field: key.to_string(),
        expected,
        found: found.field_type(),
    }
}
