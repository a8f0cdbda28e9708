//! Link templates with `<name>` placeholders

use crate::core::context::Context;
use crate::core::error::{ResolutionError, ResolutionReason};
use crate::core::resolve::{Resolve, try_lookup};
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
    // Empty names are captured too so that `<>` fails resolution
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"<(\w*)>").expect("placeholder pattern"))
}

/// A parsed link template such as `/books/<author_id>/<state>`
///
/// Placeholders are extracted once at construction; the template is
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTemplate {
    raw: String,
    placeholders: Vec<String>,
}

impl LinkTemplate {
    /// Parse a template
    ///
    /// ```rust
    /// use hyperlinks::core::template::LinkTemplate;
    ///
    /// let template = LinkTemplate::new("/books/<author_id>/<state>/<author_id>");
    /// assert_eq!(template.placeholders(), ["author_id", "state"]);
    /// ```
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let mut placeholders: Vec<String> = Vec::new();
        for caps in placeholder_regex().captures_iter(&raw) {
            let name = &caps[1];
            if !placeholders.iter().any(|known| known == name) {
                placeholders.push(name.to_string());
            }
        }
        Self { raw, placeholders }
    }

    /// The template text as declared
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Distinct placeholder names, in order of first appearance
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Substitute every placeholder
    ///
    /// Each name is resolved on `object` first, then in `context`. Missing
    /// attributes and `null` values count as absent; `0`, `false` and `""` do
    /// not. A value that exists but cannot be converted fails without falling
    /// back to the context. Substitution happens in a single pass, so resolved
    /// values are never expanded again.
    pub fn render(&self, object: &dyn Resolve, context: &Context) -> Result<String, ResolutionError> {
        if self.placeholders.is_empty() {
            return Ok(self.raw.clone());
        }

        let mut values: HashMap<&str, String> = HashMap::with_capacity(self.placeholders.len());
        for name in &self.placeholders {
            let resolved = if name.is_empty() {
                Ok(None)
            } else {
                match try_lookup(object, name) {
                    Ok(None) => try_lookup(context, name),
                    found => found,
                }
            };

            let reason = match resolved {
                Ok(Some(value)) => {
                    values.insert(name.as_str(), to_text(&value));
                    continue;
                }
                Ok(None) => ResolutionReason::Missing,
                Err(message) => ResolutionReason::Unconvertible(message),
            };
            tracing::debug!(
                template = %self.raw,
                placeholder = %name,
                reason = %reason,
                "unresolved link placeholder"
            );
            return Err(ResolutionError {
                placeholder: name.clone(),
                reason,
                object: object.describe(),
                context: context.describe(),
            });
        }

        let rendered = placeholder_regex().replace_all(&self.raw, |caps: &Captures<'_>| {
            values.get(&caps[1]).cloned().unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}

/// Textual form of a resolved value
///
/// Strings are used verbatim, everything else as compact JSON.
fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for LinkTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for LinkTemplate {
    fn from(raw: &str) -> Self {
        LinkTemplate::new(raw)
    }
}

impl From<String> for LinkTemplate {
    fn from(raw: String) -> Self {
        LinkTemplate::new(raw)
    }
}
