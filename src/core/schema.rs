//! Resource schemas
//!
//! A [`Schema`] is an ordered set of named fields. Dumping an object walks
//! the fields, consults each field's visibility and collects the visible
//! outputs into one JSON object.

use crate::core::context::Context;
use crate::core::error::{ConfigurationError, HyperlinkError};
use crate::core::field::Field;
use crate::core::resolve::Resolve;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::{Map, Value};
use std::fmt;

/// Ordered set of named fields describing one resource representation
#[derive(Default)]
pub struct Schema {
    fields: IndexMap<String, Box<dyn Field>>,
}

impl Schema {
    /// Create a schema without fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration
    pub fn field(
        mut self,
        name: impl Into<String>,
        field: impl Field + 'static,
    ) -> Result<Self, ConfigurationError> {
        self.insert(name, field)?;
        Ok(self)
    }

    /// Register a field under `name`, rejecting duplicates
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        field: impl Field + 'static,
    ) -> Result<(), ConfigurationError> {
        match self.fields.entry(name.into()) {
            Entry::Occupied(entry) => Err(ConfigurationError::DuplicateKey {
                key: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(Box::new(field));
                Ok(())
            }
        }
    }

    /// Number of registered fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is registered
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Serialize `object` with `context`
    ///
    /// Fields that request the attribute pre-check are skipped when the
    /// object lacks the attribute. Hidden fields are skipped. Any error
    /// aborts the whole dump.
    pub fn dump(
        &self,
        object: &dyn Resolve,
        context: &Context,
    ) -> Result<Map<String, Value>, HyperlinkError> {
        let mut out = Map::new();
        for (name, field) in &self.fields {
            if field.checks_attribute() {
                let attribute = field.source_attribute().unwrap_or(name.as_str());
                if object.resolve(attribute).is_none() {
                    continue;
                }
            }
            if !field.is_visible(object, context)? {
                tracing::debug!(field = %name, "field hidden by visibility rule");
                continue;
            }
            out.insert(name.clone(), field.serialize(name, object, context)?);
        }
        Ok(out)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::AttributeField;
    use crate::core::group::HyperLinks;
    use crate::core::link::LinkField;
    use crate::core::visibility::Visibility;
    use serde_json::json;

    fn author_schema() -> Schema {
        let links = HyperLinks::new()
            .link("self", LinkField::new("/authors/<id>"))
            .and_then(|g| {
                g.link(
                    "edit",
                    LinkField::new("/authors/<id>")
                        .method("PUT")
                        .visible(Visibility::flag("can_edit")),
                )
            })
            .unwrap();

        Schema::new()
            .field("id", AttributeField::new())
            .and_then(|s| s.field("name", AttributeField::new()))
            .and_then(|s| s.field("collection", LinkField::new("/authors")))
            .and_then(|s| s.field("links", links))
            .unwrap()
    }

    #[test]
    fn test_dump_with_links() {
        let schema = author_schema();
        let object = json!({"id": 1, "name": "Ann"});
        let out = schema
            .dump(&object, &Context::new().with("can_edit", true))
            .unwrap();

        assert_eq!(
            Value::Object(out),
            json!({
                "id": 1,
                "name": "Ann",
                "collection": {"href": "/authors", "method": "GET", "title": ""},
                "links": {
                    "self": {"href": "/authors/1", "method": "GET", "title": ""},
                    "edit": {"href": "/authors/1", "method": "PUT", "title": ""}
                }
            })
        );
    }

    #[test]
    fn test_link_fields_skip_attribute_check() {
        let schema = author_schema();
        let out = schema
            .dump(&json!({"id": 2}), &Context::new().with("can_edit", false))
            .unwrap();

        assert!(out.get("name").is_none());
        assert!(out.contains_key("collection"));
        assert!(out["links"].get("edit").is_none());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = Schema::new()
            .field("id", AttributeField::new())
            .and_then(|s| s.field("id", AttributeField::new()))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateKey { key } if key == "id"));
    }

    #[test]
    fn test_duplicate_insert_keeps_first_field() {
        let mut schema = Schema::new();
        schema.insert("name", AttributeField::new()).unwrap();
        let err = schema
            .insert("name", LinkField::new("/authors"))
            .unwrap_err();

        assert_eq!(err, ConfigurationError::DuplicateKey { key: "name".to_string() });
        assert_eq!(schema.len(), 1);
        let out = schema.dump(&json!({"name": "Ann"}), &Context::new()).unwrap();
        assert_eq!(out["name"], "Ann");
    }

    #[test]
    fn test_hidden_field_is_absent() {
        let schema = Schema::new()
            .field("secret", AttributeField::new().visible(false))
            .unwrap();
        let out = schema.dump(&json!({"secret": "x"}), &Context::new()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_renamed_attribute_check() {
        let schema = Schema::new()
            .field("name", AttributeField::from_attribute("full_name"))
            .unwrap();
        let out = schema.dump(&json!({"full_name": "Ann Lee"}), &Context::new()).unwrap();
        assert_eq!(out["name"], "Ann Lee");
        assert!(schema.dump(&json!({"name": "Ann"}), &Context::new()).unwrap().is_empty());
    }

    #[test]
    fn test_names_and_debug() {
        let schema = author_schema();
        assert_eq!(schema.len(), 4);
        assert_eq!(schema.names().collect::<Vec<_>>(), ["id", "name", "collection", "links"]);
        assert!(format!("{schema:?}").contains("collection"));
    }
}
