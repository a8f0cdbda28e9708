//! Groups of hyperlinks filtered by visibility

use crate::core::context::Context;
use crate::core::error::{ConfigurationError, HyperlinkError};
use crate::core::field::Field;
use crate::core::link::LinkField;
use crate::core::resolve::Resolve;
use crate::core::visibility::Visibility;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::{Map, Value};

/// A member of a link group: a single link or a nested group
#[derive(Debug, Clone)]
pub enum Hyperlink {
    Link(LinkField),
    Group(HyperLinks),
}

impl Hyperlink {
    fn field(&self) -> &dyn Field {
        match self {
            Hyperlink::Link(link) => link as &dyn Field,
            Hyperlink::Group(group) => group as &dyn Field,
        }
    }
}

impl Field for Hyperlink {
    fn is_visible(
        &self,
        object: &dyn Resolve,
        context: &Context,
    ) -> Result<bool, ConfigurationError> {
        self.field().is_visible(object, context)
    }

    fn serialize(
        &self,
        name: &str,
        object: &dyn Resolve,
        context: &Context,
    ) -> Result<Value, HyperlinkError> {
        self.field().serialize(name, object, context)
    }

    fn checks_attribute(&self) -> bool {
        false
    }
}

impl From<LinkField> for Hyperlink {
    fn from(link: LinkField) -> Self {
        Hyperlink::Link(link)
    }
}

impl From<HyperLinks> for Hyperlink {
    fn from(group: HyperLinks) -> Self {
        Hyperlink::Group(group)
    }
}

impl From<&str> for Hyperlink {
    fn from(template: &str) -> Self {
        Hyperlink::Link(LinkField::new(template))
    }
}

/// A named mapping of links, each gated by its own visibility rule
///
/// Hidden members are left out of the output entirely. Nested groups receive
/// the same object and context as their parent.
///
/// ```rust
/// use hyperlinks::prelude::*;
/// use serde_json::json;
///
/// let links = HyperLinks::new()
///     .link("self", LinkField::new("/authors/<id>"))?
///     .link("edit", LinkField::new("/authors/<id>").method("PUT").visible(false))?;
///
/// let out = links.serialize_links(&json!({"id": 1}), &Context::new())?;
/// assert_eq!(out.len(), 1);
/// assert_eq!(out["self"]["href"], "/authors/1");
/// # Ok::<(), HyperlinkError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct HyperLinks {
    links: IndexMap<String, Hyperlink>,
    visibility: Visibility,
}

impl HyperLinks {
    /// Create an empty, always visible group
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a group from `(key, member)` pairs, rejecting duplicate keys
    pub fn from_entries<K, H, I>(entries: I) -> Result<Self, ConfigurationError>
    where
        K: Into<String>,
        H: Into<Hyperlink>,
        I: IntoIterator<Item = (K, H)>,
    {
        let mut group = Self::new();
        for (key, member) in entries {
            group.insert(key, member)?;
        }
        Ok(group)
    }

    /// Builder-style insertion
    pub fn link(
        mut self,
        key: impl Into<String>,
        member: impl Into<Hyperlink>,
    ) -> Result<Self, ConfigurationError> {
        self.insert(key, member)?;
        Ok(self)
    }

    /// Add a member under `key`
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        member: impl Into<Hyperlink>,
    ) -> Result<(), ConfigurationError> {
        match self.links.entry(key.into()) {
            Entry::Occupied(entry) => Err(ConfigurationError::DuplicateKey {
                key: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(member.into());
                Ok(())
            }
        }
    }

    /// Set the visibility rule of the whole group
    pub fn visible(mut self, visibility: impl Into<Visibility>) -> Self {
        self.visibility = visibility.into();
        self
    }

    /// Visibility rule of the whole group
    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Member declared under `key`
    pub fn get(&self, key: &str) -> Option<&Hyperlink> {
        self.links.get(key)
    }

    /// Number of members, visible or not
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the group has no members
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Members in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Hyperlink)> {
        self.links.iter().map(|(key, member)| (key.as_str(), member))
    }

    /// Render every visible member
    ///
    /// The group's own visibility is not consulted here; that is the job of
    /// whoever holds the group.
    pub fn serialize_links(
        &self,
        object: &dyn Resolve,
        context: &Context,
    ) -> Result<Map<String, Value>, HyperlinkError> {
        let mut out = Map::new();
        for (key, member) in &self.links {
            if !member.is_visible(object, context)? {
                tracing::debug!(key = %key, "link hidden by visibility rule");
                continue;
            }
            out.insert(key.clone(), member.serialize(key, object, context)?);
        }
        Ok(out)
    }
}

impl Field for HyperLinks {
    fn is_visible(
        &self,
        object: &dyn Resolve,
        context: &Context,
    ) -> Result<bool, ConfigurationError> {
        self.visibility.is_visible(object, context)
    }

    fn serialize(
        &self,
        _name: &str,
        object: &dyn Resolve,
        context: &Context,
    ) -> Result<Value, HyperlinkError> {
        self.serialize_links(object, context).map(Value::Object)
    }

    fn checks_attribute(&self) -> bool {
        false
    }
}
