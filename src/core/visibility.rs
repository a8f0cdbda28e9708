//! Conditional field visibility
//!
//! Every link field and link group holds a [`Visibility`] rule and consults
//! it before producing output. Rules are either constants or predicates over
//! the serialized object and the request context.

use crate::core::context::Context;
use crate::core::error::ConfigurationError;
use crate::core::resolve::{Resolve, try_lookup};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Typed predicate, always yields a boolean
pub type Predicate = Arc<dyn Fn(&dyn Resolve, &Context) -> bool + Send + Sync>;

/// Untyped predicate, its result must be a JSON boolean
pub type ValuePredicate = Arc<dyn Fn(&dyn Resolve, &Context) -> Value + Send + Sync>;

/// Visibility rule of a field
#[derive(Clone)]
pub enum Visibility {
    /// Always shown (`true`) or always hidden (`false`)
    Constant(bool),

    /// Decided by a function of the object and the context
    Predicate(Predicate),

    /// Decided by a function returning a JSON value that must be a boolean
    Value(ValuePredicate),

    /// Decided by a boolean attribute of the object, falling back to the
    /// context entry of the same name
    Flag(String),
}

impl Visibility {
    /// Rule that always shows the field
    pub fn visible() -> Self {
        Visibility::Constant(true)
    }

    /// Rule that always hides the field
    pub fn hidden() -> Self {
        Visibility::Constant(false)
    }

    /// Rule backed by a typed predicate
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&dyn Resolve, &Context) -> bool + Send + Sync + 'static,
    {
        Visibility::Predicate(Arc::new(predicate))
    }

    /// Rule backed by a predicate producing a JSON value
    pub fn when_value<F>(predicate: F) -> Self
    where
        F: Fn(&dyn Resolve, &Context) -> Value + Send + Sync + 'static,
    {
        Visibility::Value(Arc::new(predicate))
    }

    /// Rule backed by a boolean attribute or context entry
    pub fn flag(name: impl Into<String>) -> Self {
        Visibility::Flag(name.into())
    }

    /// Decide whether the field appears in the output
    ///
    /// Fails with [`ConfigurationError::NonBooleanVisibility`] when a
    /// predicate or flag yields anything but a strict boolean.
    pub fn is_visible(
        &self,
        object: &dyn Resolve,
        context: &Context,
    ) -> Result<bool, ConfigurationError> {
        match self {
            Visibility::Constant(visible) => Ok(*visible),
            Visibility::Predicate(predicate) => Ok(predicate(object, context)),
            Visibility::Value(predicate) => strict_bool(predicate(object, context)),
            Visibility::Flag(name) => {
                let found = match try_lookup(object, name) {
                    Ok(None) => try_lookup(context, name),
                    found => found,
                };
                match found {
                    Ok(value) => strict_bool(value.unwrap_or(Value::Null)),
                    Err(message) => Err(ConfigurationError::NonBooleanVisibility { found: message }),
                }
            }
        }
    }
}

fn strict_bool(value: Value) -> Result<bool, ConfigurationError> {
    match value {
        Value::Bool(visible) => Ok(visible),
        other => Err(ConfigurationError::NonBooleanVisibility {
            found: other.to_string(),
        }),
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::visible()
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        Visibility::Constant(visible)
    }
}

/// Declarative form: `true`, `false` or `{ "flag": "<name>" }`
impl TryFrom<&Value> for Visibility {
    type Error = ConfigurationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(visible) => Ok(Visibility::Constant(*visible)),
            Value::Object(map) if map.len() == 1 => match map.get("flag") {
                Some(Value::String(name)) if !name.is_empty() => Ok(Visibility::flag(name)),
                _ => Err(ConfigurationError::InvalidVisibilityRule {
                    found: value.to_string(),
                }),
            },
            other => Err(ConfigurationError::InvalidVisibilityRule {
                found: other.to_string(),
            }),
        }
    }
}

impl fmt::Debug for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Constant(visible) => f.debug_tuple("Constant").field(visible).finish(),
            Visibility::Predicate(_) => f.write_str("Predicate(<fn>)"),
            Visibility::Value(_) => f.write_str("Value(<fn>)"),
            Visibility::Flag(name) => f.debug_tuple("Flag").field(name).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_constants_ignore_inputs() {
        let object = json!({"admin": false});
        let context = Context::new().with("admin", false);

        assert!(Visibility::visible().is_visible(&object, &context).unwrap());
        assert!(!Visibility::hidden().is_visible(&object, &context).unwrap());
        assert!(Visibility::default().is_visible(&json!({}), &Context::new()).unwrap());
        assert!(Visibility::from(true).is_visible(&object, &context).unwrap());
    }

    #[test]
    fn test_predicate_result_is_honored() {
        let rule = Visibility::when(|object, context| {
            object.resolve("owner_id") == context.get("user_id").cloned()
        });
        let object = json!({"owner_id": 4});

        assert!(rule.is_visible(&object, &Context::new().with("user_id", 4)).unwrap());
        assert!(!rule.is_visible(&object, &Context::new().with("user_id", 5)).unwrap());
    }

    #[test]
    fn test_value_predicate_requires_boolean() {
        let rule = Visibility::when_value(|object, _| object.resolve("published").unwrap_or_default());

        assert!(rule.is_visible(&json!({"published": true}), &Context::new()).unwrap());
        assert!(!rule.is_visible(&json!({"published": false}), &Context::new()).unwrap());

        let err = rule
            .is_visible(&json!({"published": 1}), &Context::new())
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::NonBooleanVisibility {
                found: "1".to_string()
            }
        );
    }

    #[test]
    fn test_flag_prefers_object_then_context() {
        let rule = Visibility::flag("can_edit");

        assert!(rule.is_visible(&json!({"can_edit": true}), &Context::new().with("can_edit", false)).unwrap());
        assert!(rule.is_visible(&json!({}), &Context::new().with("can_edit", true)).unwrap());
        assert!(!rule.is_visible(&json!({"can_edit": null}), &Context::new().with("can_edit", false)).unwrap());
    }

    #[test]
    fn test_flag_missing_or_non_boolean_fails() {
        let rule = Visibility::flag("can_edit");

        let err = rule.is_visible(&json!({}), &Context::new()).unwrap_err();
        assert!(matches!(err, ConfigurationError::NonBooleanVisibility { found } if found == "null"));

        let err = rule
            .is_visible(&json!({"can_edit": "yes"}), &Context::new())
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::NonBooleanVisibility { .. }));
    }

    #[test]
    fn test_flag_with_unconvertible_value_fails() {
        let object: std::collections::HashMap<String, f64> = [("can_edit".to_string(), f64::NAN)].into();
        let err = Visibility::flag("can_edit")
            .is_visible(&object, &Context::new().with("can_edit", true))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::NonBooleanVisibility { found } if found.contains("NaN")));
    }

    #[test]
    fn test_declarative_rules() {
        assert!(matches!(
            Visibility::try_from(&json!(false)),
            Ok(Visibility::Constant(false))
        ));
        assert!(matches!(
            Visibility::try_from(&json!({"flag": "is_admin"})),
            Ok(Visibility::Flag(name)) if name == "is_admin"
        ));
    }

    #[test]
    fn test_declarative_rule_rejects_other_types() {
        for value in [json!("yes"), json!(1), json!(null), json!([true]), json!({"flag": 3}), json!({"other": "x"})] {
            let err = Visibility::try_from(&value).unwrap_err();
            assert!(
                matches!(err, ConfigurationError::InvalidVisibilityRule { .. }),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_debug_output() {
        assert_eq!(format!("{:?}", Visibility::hidden()), "Constant(false)");
        assert_eq!(format!("{:?}", Visibility::when(|_, _| true)), "Predicate(<fn>)");
        assert_eq!(format!("{:?}", Visibility::flag("x")), "Flag(\"x\")");
    }
}
