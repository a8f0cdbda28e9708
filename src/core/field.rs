//! Serializable fields
//!
//! [`Field`] is the seam between link fields and the schema that
//! serializes a resource. Link fields and link groups implement it, as does
//! [`AttributeField`] for plain data.

use crate::core::context::Context;
use crate::core::error::{ConfigurationError, HyperlinkError};
use crate::core::resolve::Resolve;
use crate::core::visibility::Visibility;
use serde_json::Value;

/// A field of a resource schema
pub trait Field: Send + Sync {
    /// Whether the field appears in the output for this object and context
    fn is_visible(
        &self,
        _object: &dyn Resolve,
        _context: &Context,
    ) -> Result<bool, ConfigurationError> {
        Ok(true)
    }

    /// Produce the output value of the field declared under `name`
    fn serialize(
        &self,
        name: &str,
        object: &dyn Resolve,
        context: &Context,
    ) -> Result<Value, HyperlinkError>;

    /// Whether the schema must skip this field when the object has no
    /// attribute of the same name
    fn checks_attribute(&self) -> bool {
        true
    }

    /// Attribute read from the object, when it differs from the field name
    fn source_attribute(&self) -> Option<&str> {
        None
    }
}

/// Plain field copying an attribute of the object
#[derive(Debug, Clone, Default)]
pub struct AttributeField {
    attribute: Option<String>,
    visibility: Visibility,
}

impl AttributeField {
    /// Copy the attribute named like the field, always visible
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the value from `attribute` instead of the field name
    pub fn from_attribute(attribute: impl Into<String>) -> Self {
        Self {
            attribute: Some(attribute.into()),
            ..Self::default()
        }
    }

    /// Set the visibility rule
    pub fn visible(mut self, visibility: impl Into<Visibility>) -> Self {
        self.visibility = visibility.into();
        self
    }

    /// Source attribute, when it differs from the field name
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }
}

impl Field for AttributeField {
    fn is_visible(
        &self,
        object: &dyn Resolve,
        context: &Context,
    ) -> Result<bool, ConfigurationError> {
        self.visibility.is_visible(object, context)
    }

    fn serialize(
        &self,
        name: &str,
        object: &dyn Resolve,
        _context: &Context,
    ) -> Result<Value, HyperlinkError> {
        let attribute = self.attribute.as_deref().unwrap_or(name);
        Ok(object.resolve(attribute).unwrap_or(Value::Null))
    }

    fn source_attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_field_copies_value() {
        let field = AttributeField::new();
        let object = json!({"name": "Ann", "age": 3});
        assert_eq!(field.serialize("name", &object, &Context::new()).unwrap(), json!("Ann"));
        assert_eq!(field.serialize("missing", &object, &Context::new()).unwrap(), Value::Null);
        assert!(field.checks_attribute());
    }

    #[test]
    fn test_attribute_field_renamed_source() {
        let field = AttributeField::from_attribute("full_name");
        assert_eq!(field.attribute(), Some("full_name"));
        let object = json!({"full_name": "Ann Lee"});
        assert_eq!(field.serialize("name", &object, &Context::new()).unwrap(), json!("Ann Lee"));
    }

    #[test]
    fn test_attribute_field_visibility() {
        let field = AttributeField::new().visible(Visibility::flag("show"));
        let object = json!({"show": false});
        assert!(!field.is_visible(&object, &Context::new()).unwrap());
    }
}
