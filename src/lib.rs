//! # Hyperlinks
//!
//! HATEOAS link fields for resource serialization.
//!
//! ## Features
//!
//! - **Link Fields**: Render `{href, method, title}` from templates such as `/authors/<id>`
//! - **Context Fallback**: Placeholders resolve on the object first, then on a request context
//! - **Link Groups**: Nested mappings of links, each gated by its own visibility rule
//! - **Visibility Rules**: Constants, typed predicates, or boolean flags
//! - **Any Object Shape**: JSON values, maps, and serializable structs
//! - **Configuration-Based**: Declare resource links in YAML or JSON
//! - **Thread-Safe**: Definitions are immutable and `Send + Sync`
//!
//! ## Quick Start
//!
//! ```rust
//! use hyperlinks::prelude::*;
//! use serde_json::json;
//!
//! let links = HyperLinks::new()
//!     .link("self", LinkField::new("/authors/<id>"))?
//!     .link("books", LinkField::new("/authors/<id>/books").title("Books"))?
//!     .link(
//!         "edit",
//!         LinkField::new("/authors/<id>")
//!             .method("PUT")
//!             .visible(Visibility::flag("can_edit")),
//!     )?;
//!
//! let schema = Schema::new()
//!     .field("id", AttributeField::new())?
//!     .field("name", AttributeField::new())?
//!     .field("links", links)?;
//!
//! let author = json!({"id": 1, "name": "William Shakespeare"});
//! let context = Context::new().with("can_edit", false);
//! let out = schema.dump(&author, &context)?;
//!
//! assert_eq!(out["links"]["self"]["href"], "/authors/1");
//! assert!(out["links"].get("edit").is_none());
//! # Ok::<(), HyperlinkError>(())
//! ```

pub mod config;
pub mod core;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Fields ===
    pub use crate::core::{
        field::{AttributeField, Field},
        group::{HyperLinks, Hyperlink},
        link::{LinkField, RenderedLink},
        schema::Schema,
        template::LinkTemplate,
        visibility::Visibility,
    };

    // === Objects & Context ===
    pub use crate::core::{
        context::Context,
        resolve::{Attributes, Resolve},
    };

    // === Errors ===
    pub use crate::core::error::{
        ConfigurationError, ErrorResponse, HyperlinkError, ResolutionError, ResolutionReason,
    };

    // === Configuration ===
    pub use crate::config::LinksConfig;
}
