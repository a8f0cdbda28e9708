//! Configuration loading for declarative link definitions
//!
//! ```yaml
//! resources:
//!   author:
//!     self: /authors/<id>
//!     edit:
//!       href: /authors/<id>
//!       method: PUT
//!       title: Edit author
//!       visible: { flag: can_edit }
//!     books:
//!       links:
//!         list: { href: /authors/<id>/books }
//! ```
//!
//! A node with `href` (or a bare string) is a link, a node with `links` is a
//! nested group. `visible` accepts a boolean or `{ flag: <name> }`.

use crate::core::{ConfigurationError, HyperLinks, Hyperlink, LinkField, Visibility};
use anyhow::{Context as _, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Declarative link definitions, as written in a configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinksDocument {
    /// Resource name -> links of that resource
    pub resources: IndexMap<String, IndexMap<String, NodeDef>>,
}

/// One entry of a link group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeDef {
    /// Bare template, shorthand for `{ href: <template> }`
    Template(String),

    Link(LinkDef),

    Group(GroupDef),
}

/// A single link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkDef {
    /// Target template, e.g. `/authors/<id>`
    pub href: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Visibility rule, checked when the link is built
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<Value>,
}

/// A nested link group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupDef {
    pub links: IndexMap<String, NodeDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<Value>,
}

impl NodeDef {
    /// Build the runtime link or group
    pub fn build(self) -> Result<Hyperlink, ConfigurationError> {
        match self {
            NodeDef::Template(template) => Ok(LinkField::new(template).into()),
            NodeDef::Link(link) => link.build().map(Hyperlink::Link),
            NodeDef::Group(group) => group.build().map(Hyperlink::Group),
        }
    }
}

impl LinkDef {
    /// Build the runtime link, validating its visibility rule
    pub fn build(self) -> Result<LinkField, ConfigurationError> {
        let mut link = LinkField::new(self.href).visible(visibility(self.visible.as_ref())?);
        if let Some(method) = self.method {
            link = link.method(method);
        }
        if let Some(title) = self.title {
            link = link.title(title);
        }
        Ok(link)
    }
}

impl GroupDef {
    /// Build the runtime group, validating every member
    pub fn build(self) -> Result<HyperLinks, ConfigurationError> {
        let visible = visibility(self.visible.as_ref())?;
        Ok(build_group(self.links)?.visible(visible))
    }
}

fn build_group(links: IndexMap<String, NodeDef>) -> Result<HyperLinks, ConfigurationError> {
    let mut group = HyperLinks::new();
    for (key, node) in links {
        let member = node.build()?;
        group.insert(key, member)?;
    }
    Ok(group)
}

fn visibility(rule: Option<&Value>) -> Result<Visibility, ConfigurationError> {
    rule.map(Visibility::try_from)
        .unwrap_or_else(|| Ok(Visibility::default()))
}

/// Link groups declared per resource
#[derive(Debug, Clone, Default)]
pub struct LinksConfig {
    resources: IndexMap<String, HyperLinks>,
}

impl LinksConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read links config {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("invalid links config {}", path.display()))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let document: LinksDocument = serde_yaml::from_str(yaml)?;
        Ok(Self::from_document(document)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: LinksDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(document)?)
    }

    /// Build the runtime link groups of a parsed document
    pub fn from_document(document: LinksDocument) -> Result<Self, ConfigurationError> {
        let mut config = Self::default();
        for (name, links) in document.resources {
            let group = build_group(links)?;
            tracing::debug!(resource = %name, links = group.len(), "loaded resource links");
            config.resources.insert(name, group);
        }
        Ok(config)
    }

    /// Build the configuration from an already parsed JSON value
    ///
    /// Unlike the string loaders, malformed entries are reported as
    /// [`ConfigurationError`]s naming the offending key.
    pub fn from_value(value: &Value) -> Result<Self, ConfigurationError> {
        #[derive(Deserialize)]
        struct Resources {
            resources: IndexMap<String, Value>,
        }

        let document = Resources::deserialize(value).map_err(|_| ConfigurationError::InvalidGroup {
            found: value.to_string(),
        })?;

        let mut config = Self::default();
        for (name, links) in document.resources {
            let group = parse_group(&links)?;
            tracing::debug!(resource = %name, links = group.len(), "loaded resource links");
            config.resources.insert(name, group);
        }
        Ok(config)
    }

    /// Link group of a resource
    pub fn resource(&self, name: &str) -> Option<&HyperLinks> {
        self.resources.get(name)
    }

    /// Resource names in declaration order
    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Number of declared resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether no resource is declared
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Parse a mapping of key to link or nested group
pub fn parse_group(value: &Value) -> Result<HyperLinks, ConfigurationError> {
    let nodes = IndexMap::<String, Value>::deserialize(value).map_err(|_| {
        ConfigurationError::InvalidGroup {
            found: value.to_string(),
        }
    })?;

    let mut group = HyperLinks::new();
    for (key, node) in nodes {
        let def = NodeDef::deserialize(&node).map_err(|_| invalid_node(&key, &node))?;
        group.insert(key, def.build()?)?;
    }
    Ok(group)
}

/// Explain why `node` matched neither a template, a link nor a group
///
/// The node is deserialized again as the shape it most resembles so the
/// error carries serde's message, and nested groups report the innermost
/// failing key.
fn invalid_node(key: &str, node: &Value) -> ConfigurationError {
    let message = match node {
        Value::Object(map) => match map.get("links") {
            Some(Value::Object(links)) if !map.contains_key("href") => {
                let failing = links
                    .iter()
                    .find(|(_, child)| NodeDef::deserialize(*child).is_err());
                if let Some((child_key, child)) = failing {
                    return invalid_node(child_key, child);
                }
                GroupDef::deserialize(node).err().map(|e| e.to_string())
            }
            Some(links) if !map.contains_key("href") => {
                return ConfigurationError::InvalidGroup {
                    found: links.to_string(),
                };
            }
            _ => LinkDef::deserialize(node).err().map(|e| e.to_string()),
        },
        other => Some(format!("expected a template or a mapping, got {other}")),
    };

    ConfigurationError::InvalidLink {
        key: key.to_string(),
        message: message.unwrap_or_else(|| "unrecognized link definition".to_string()),
    }
}
