//! Single hyperlink fields

use crate::core::context::Context;
use crate::core::error::{ConfigurationError, HyperlinkError};
use crate::core::field::Field;
use crate::core::resolve::Resolve;
use crate::core::template::LinkTemplate;
use crate::core::visibility::Visibility;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default HTTP method label of a link
pub const DEFAULT_METHOD: &str = "GET";

/// The rendered form of one link field
///
/// The target is serialized under the `href` key. `title` is always
/// present, empty when none is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedLink {
    #[serde(rename = "href")]
    pub target: String,
    pub method: String,
    pub title: String,
}

/// A field rendering one link from a template
///
/// ```rust
/// use hyperlinks::prelude::*;
/// use serde_json::json;
///
/// let edit = LinkField::new("/authors/<id>").method("PUT").title("Edit author");
/// let link = edit.render(&json!({"id": 1}), &Context::new()).unwrap();
///
/// assert_eq!(link.target, "/authors/1");
/// assert_eq!(link.method, "PUT");
/// assert_eq!(link.title, "Edit author");
/// ```
#[derive(Debug, Clone)]
pub struct LinkField {
    template: LinkTemplate,
    method: String,
    title: String,
    visibility: Visibility,
}

impl LinkField {
    /// Create a `GET` link with an empty title, always visible
    pub fn new(template: impl Into<LinkTemplate>) -> Self {
        Self {
            template: template.into(),
            method: DEFAULT_METHOD.to_string(),
            title: String::new(),
            visibility: Visibility::default(),
        }
    }

    /// Set the HTTP method label
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Set the display title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the visibility rule
    pub fn visible(mut self, visibility: impl Into<Visibility>) -> Self {
        self.visibility = visibility.into();
        self
    }

    /// The parsed target template
    pub fn template(&self) -> &LinkTemplate {
        &self.template
    }

    /// HTTP method label, `GET` unless set
    pub fn method_label(&self) -> &str {
        &self.method
    }

    /// Display title, empty unless set
    pub fn title_label(&self) -> &str {
        &self.title
    }

    /// Visibility rule of the link
    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Render the link for `object`, ignoring visibility
    pub fn render(
        &self,
        object: &dyn Resolve,
        context: &Context,
    ) -> Result<RenderedLink, HyperlinkError> {
        let target = self.template.render(object, context)?;
        tracing::trace!(template = %self.template, target = %target, "rendered link");
        Ok(RenderedLink {
            target,
            method: self.method.clone(),
            title: self.title.clone(),
        })
    }
}

impl Field for LinkField {
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
        let link = self.render(object, context)?;
        Ok(serde_json::json!(link))
    }

    fn checks_attribute(&self) -> bool {
        false
    }
}

impl From<&str> for LinkField {
    fn from(template: &str) -> Self {
        LinkField::new(template)
    }
}
