//! Typed error handling for hyperlink rendering
//!
//! Two categories exist and neither is recovered from locally:
//!
//! - [`ConfigurationError`]: a field, group or visibility rule is declared
//!   incorrectly. Raised at construction or on first evaluation.
//! - [`ResolutionError`]: a placeholder of a link template could not be
//!   resolved from the object nor from the context.
//!
//! # Example
//!
//! ```rust
//! use hyperlinks::prelude::*;
//! use serde_json::json;
//!
//! let link = LinkField::new("/authors/<id>");
//! let err = link.render(&json!({}), &Context::new()).unwrap_err();
//!
//! assert_eq!(err.error_code(), "RESOLUTION_ERROR");
//! assert!(matches!(err, HyperlinkError::Resolution(ref e) if e.placeholder == "id"));
//! ```

use serde::Serialize;
use thiserror::Error;

/// The main error type of the crate
#[derive(Debug, Error, PartialEq)]
pub enum HyperlinkError {
    /// Invalid field, group or visibility declaration
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Unresolvable link placeholder
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Error response structure, ready to be embedded in an API error payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl HyperlinkError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            HyperlinkError::Configuration(_) => "CONFIGURATION_ERROR",
            HyperlinkError::Resolution(_) => "RESOLUTION_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            HyperlinkError::Resolution(e) => Some(serde_json::json!({
                "placeholder": e.placeholder,
                "reason": e.reason.to_string(),
                "object": e.object,
                "context": e.context,
            })),
            HyperlinkError::Configuration(ConfigurationError::DuplicateKey { key })
            | HyperlinkError::Configuration(ConfigurationError::InvalidLink { key, .. }) => {
                Some(serde_json::json!({ "key": key }))
            }
            HyperlinkError::Configuration(_) => None,
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised by invalid declarations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigurationError {
    /// Visibility rule was neither a boolean nor a predicate
    #[error("visibility rule must be boolean or callable, got {found}")]
    InvalidVisibilityRule { found: String },

    /// Visibility predicate produced something other than a boolean
    #[error("visibility function must return a boolean, got {found}")]
    NonBooleanVisibility { found: String },

    /// Group specification was not a mapping
    #[error("link group specification must be a mapping, got {found}")]
    InvalidGroup { found: String },

    /// The same key was declared twice in a group or schema
    #[error("duplicate field key '{key}'")]
    DuplicateKey { key: String },

    /// A declarative link entry is malformed
    #[error("invalid link definition for '{key}': {message}")]
    InvalidLink { key: String, message: String },
}

// =============================================================================
// Resolution Errors
// =============================================================================

/// A link placeholder that could not be turned into text
///
/// `object` and `context` hold textual snapshots of the inputs for
/// diagnostics.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("<{placeholder}> {reason} of object: {object}, context: {context}")]
pub struct ResolutionError {
    pub placeholder: String,
    pub reason: ResolutionReason,
    pub object: String,
    pub context: String,
}

/// Why a placeholder failed to resolve
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolutionReason {
    /// Neither the object nor the context holds a value
    #[error("is not a valid attribute")]
    Missing,

    /// A value exists but cannot be represented as JSON
    #[error("could not be converted ({0})")]
    Unconvertible(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_message() {
        let err = ResolutionError {
            placeholder: "id".to_string(),
            reason: ResolutionReason::Missing,
            object: "{}".to_string(),
            context: "{}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "<id> is not a valid attribute of object: {}, context: {}"
        );
    }

    #[test]
    fn test_unconvertible_error_message() {
        let err = ResolutionError {
            placeholder: "x".to_string(),
            reason: ResolutionReason::Unconvertible("non-finite number NaN".to_string()),
            object: "{\"x\":\"<NaN>\"}".to_string(),
            context: "{}".to_string(),
        };
        assert!(
            err.to_string()
                .starts_with("<x> could not be converted (non-finite number NaN) of object")
        );
    }

    #[test]
    fn test_configuration_error_messages() {
        let err = ConfigurationError::NonBooleanVisibility {
            found: "\"yes\"".to_string(),
        };
        assert!(
            err.to_string()
                .starts_with("visibility function must return a boolean")
        );

        let err = ConfigurationError::InvalidVisibilityRule {
            found: "42".to_string(),
        };
        assert!(
            err.to_string()
                .starts_with("visibility rule must be boolean or callable")
        );
    }

    #[test]
    fn test_error_codes() {
        let resolution: HyperlinkError = ResolutionError {
            placeholder: "id".to_string(),
            reason: ResolutionReason::Missing,
            object: "{}".to_string(),
            context: "{}".to_string(),
        }
        .into();
        assert_eq!(resolution.error_code(), "RESOLUTION_ERROR");

        let config: HyperlinkError = ConfigurationError::InvalidGroup {
            found: "[]".to_string(),
        }
        .into();
        assert_eq!(config.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_resolution_response_details() {
        let err: HyperlinkError = ResolutionError {
            placeholder: "state".to_string(),
            reason: ResolutionReason::Missing,
            object: "{\"id\":1}".to_string(),
            context: "{}".to_string(),
        }
        .into();

        let response = err.to_response();
        assert_eq!(response.code, "RESOLUTION_ERROR");
        let details = response.details.expect("resolution errors carry details");
        assert_eq!(details["placeholder"], "state");
        assert_eq!(details["object"], "{\"id\":1}");
    }

    #[test]
    fn test_duplicate_key_response_details() {
        let err: HyperlinkError = ConfigurationError::DuplicateKey {
            key: "self".to_string(),
        }
        .into();

        let json = serde_json::to_value(err.to_response()).unwrap();
        assert_eq!(json["code"], "CONFIGURATION_ERROR");
        assert_eq!(json["details"]["key"], "self");
    }

    #[test]
    fn test_response_without_details_skips_field() {
        let err: HyperlinkError = ConfigurationError::InvalidGroup {
            found: "\"x\"".to_string(),
        }
        .into();

        let json = serde_json::to_value(err.to_response()).unwrap();
        assert!(json.get("details").is_none());
    }
}
