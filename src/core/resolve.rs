//! Attribute resolution on serialized objects
//!
//! Link templates look up placeholder values on the object being serialized.
//! Objects come in two shapes: mappings (JSON objects, hash maps) and
//! attribute-bearing structs. Both are reached through the single
//! [`Resolve`] capability so the renderer never assumes one access style.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Resolve a field of an object by name
///
/// Returning `None` means the attribute is missing. A present `null` value is
/// treated as missing by the renderer as well, see [`lookup`].
pub trait Resolve {
    /// Look up the attribute or key `name`
    fn resolve(&self, name: &str) -> Option<Value>;

    /// Look up `name`, reporting a value that exists but has no JSON form
    ///
    /// The renderer goes through this method so that such a value fails
    /// instead of reading as missing. Adapters that convert values override
    /// it; the default never fails.
    fn try_resolve(&self, name: &str) -> Result<Option<Value>, String> {
        Ok(self.resolve(name))
    }

    /// Textual snapshot of the object, used in error diagnostics
    fn describe(&self) -> String;
}

/// Resolve `name` on `object`, treating `null` as missing
pub fn lookup<R: Resolve + ?Sized>(object: &R, name: &str) -> Option<Value> {
    object.resolve(name).filter(|value| !value.is_null())
}

/// Like [`lookup`], but conversion failures are returned instead of hidden
pub fn try_lookup<R: Resolve + ?Sized>(object: &R, name: &str) -> Result<Option<Value>, String> {
    Ok(object.try_resolve(name)?.filter(|value| !value.is_null()))
}

/// Convert a serializable value to JSON
///
/// serde_json turns non-finite floats into `null`, which would make a present
/// value look missing. The value is serialized through serde_yaml, which keeps
/// them, and anything JSON cannot hold (non-finite floats, non-scalar map
/// keys) is rejected.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, String> {
    let yaml = serde_yaml::to_value(value).map_err(|e| e.to_string())?;
    yaml_to_json(yaml)
}

fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("non-finite number {f}"))?
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(map)
        }
        // Enum variants carrying data, shaped like serde_json's `{"Variant": value}`
        Yaml::Tagged(tagged) => {
            let variant = tagged.tag.to_string().trim_start_matches('!').to_string();
            let mut map = Map::new();
            map.insert(variant, yaml_to_json(tagged.value)?);
            Value::Object(map)
        }
    })
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        other => Err(format!("map key {other:?} is not a string")),
    }
}

/// JSON form of a possibly unconvertible value, for diagnostics only
fn describe_value(value: &Result<Value, String>) -> Value {
    match value {
        Ok(value) => value.clone(),
        Err(message) => Value::String(format!("<{message}>")),
    }
}

impl<R: Resolve + ?Sized> Resolve for &R {
    fn resolve(&self, name: &str) -> Option<Value> {
        (**self).resolve(name)
    }

    fn try_resolve(&self, name: &str) -> Result<Option<Value>, String> {
        (**self).try_resolve(name)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl Resolve for Value {
    fn resolve(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(map) => map.get(name).cloned(),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl Resolve for Map<String, Value> {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn describe(&self) -> String {
        Value::Object(self.clone()).to_string()
    }
}

// `resolve` reads an unconvertible value as missing; `try_resolve` reports it.
macro_rules! impl_resolve_for_map {
    ($($map:ident),+ $(,)?) => {
        $(
            impl<V: Serialize> Resolve for $map<String, V> {
                fn resolve(&self, name: &str) -> Option<Value> {
                    self.try_resolve(name).ok().flatten()
                }

                fn try_resolve(&self, name: &str) -> Result<Option<Value>, String> {
                    self.get(name).map(to_json).transpose()
                }

                fn describe(&self) -> String {
                    let entries: Map<String, Value> = self
                        .iter()
                        .map(|(key, value)| (key.clone(), describe_value(&to_json(value))))
                        .collect();
                    Value::Object(entries).to_string()
                }
            }
        )+
    };
}

impl_resolve_for_map!(HashMap, BTreeMap, IndexMap);

/// Attribute-style adapter for any `T: Serialize`
///
/// The value is serialized once by [`Attributes::new`]. Named fields become
/// resolvable attributes; a value that does not serialize to a mapping
/// (a scalar, a sequence) exposes no attributes. A field whose value has no
/// JSON form is kept and fails when resolved through
/// [`Resolve::try_resolve`].
///
/// ```rust
/// use hyperlinks::core::resolve::{Attributes, Resolve};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Author {
///     id: u32,
///     name: String,
/// }
///
/// let author = Author { id: 1, name: "William Shakespeare".into() };
/// let attrs = Attributes::new(&author).unwrap();
/// assert_eq!(attrs.resolve("id"), Some(serde_json::json!(1)));
/// assert_eq!(attrs.resolve("missing"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Attributes {
    type_name: &'static str,
    fields: IndexMap<String, Result<Value, String>>,
}

impl Attributes {
    /// Capture the attributes of `object`
    pub fn new<T: Serialize>(object: &T) -> Result<Self, serde_yaml::Error> {
        let fields = match serde_yaml::to_value(object)? {
            serde_yaml::Value::Mapping(mapping) => mapping
                .into_iter()
                .filter_map(|(key, value)| {
                    yaml_key(key).ok().map(|key| (key, yaml_to_json(value)))
                })
                .collect(),
            _ => IndexMap::new(),
        };
        let type_name = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("object");
        Ok(Self { type_name, fields })
    }

    /// Name of the wrapped type, without its module path
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl Resolve for Attributes {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.fields.get(name).and_then(|value| value.clone().ok())
    }

    fn try_resolve(&self, name: &str) -> Result<Option<Value>, String> {
        self.fields.get(name).cloned().transpose()
    }

    fn describe(&self) -> String {
        let entries: Map<String, Value> = self
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), describe_value(value)))
            .collect();
        format!("{}{}", self.type_name, Value::Object(entries))
    }
}
