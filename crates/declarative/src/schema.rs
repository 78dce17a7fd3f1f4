//! Field schema for declarative resources
//!
//! A schema lists every field a resource understands, with its type and
//! whether the caller must, may, or must not supply it.

use crate::data::Value;
use serde::Serialize;
use std::fmt;

/// Type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Bool,
    Int,
}

impl FieldType {
    /// Zero value used when an optional field has neither a value nor a default
    pub fn zero(self) -> Value {
        match self {
            Self::String => Value::String(String::new()),
            Self::Bool => Value::Bool(false),
            Self::Int => Value::Int(0),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
        }
    }
}

/// Declaration of a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub optional: bool,
    /// Set by the resource from the remote side, never by the caller
    pub computed: bool,
    /// Never displayed, logged, or emitted in tracked output
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldSchema {
    fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            optional: true,
            computed: false,
            sensitive: false,
            default: None,
        }
    }

    /// Declare a string field (optional until marked otherwise)
    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldType::String)
    }

    /// Declare a bool field
    pub fn bool(name: &'static str) -> Self {
        Self::new(name, FieldType::Bool)
    }

    /// Declare an int field
    pub fn int(name: &'static str) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.optional = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self.optional = false;
        self.required = false;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Ordered set of field declarations for one resource type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All fields in declaration order
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Fields the caller must supply
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn is_sensitive(&self, name: &str) -> bool {
        self.field(name).is_some_and(|f| f.sensitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schema {
        Schema::new(vec![
            FieldSchema::int("id").computed(),
            FieldSchema::string("name").required(),
            FieldSchema::string("secret").required().sensitive(),
            FieldSchema::bool("enabled").default_value(true),
        ])
    }

    #[test]
    fn test_builder_flags() {
        let schema = sample();

        let id = schema.field("id").unwrap();
        assert!(id.computed && !id.optional && !id.required);

        let name = schema.field("name").unwrap();
        assert!(name.required && !name.optional);

        let enabled = schema.field("enabled").unwrap();
        assert!(enabled.optional);
        assert_eq!(enabled.default, Some(Value::Bool(true)));
    }

    #[test]
    fn test_required_fields() {
        let schema = sample();
        let names: Vec<_> = schema.required_fields().map(|f| f.name).collect();
        assert_eq!(names, vec!["name", "secret"]);
    }

    #[test]
    fn test_sensitive() {
        let schema = sample();
        assert!(schema.is_sensitive("secret"));
        assert!(!schema.is_sensitive("name"));
        assert!(!schema.is_sensitive("missing"));
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(FieldType::String.zero(), Value::String(String::new()));
        assert_eq!(FieldType::Bool.zero(), Value::Bool(false));
        assert_eq!(FieldType::Int.zero(), Value::Int(0));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json[0]["name"], "id");
        assert_eq!(json[0]["type"], "int");
        assert_eq!(json[3]["default"], true);
        assert!(json[1].get("default").is_none());
    }
}
