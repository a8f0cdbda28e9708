//! Core module containing link fields, link groups and their visibility rules

pub mod context;
pub mod error;
pub mod field;
pub mod group;
pub mod link;
pub mod resolve;
pub mod schema;
pub mod template;
pub mod visibility;

pub use context::Context;
pub use error::{ConfigurationError, ErrorResponse, HyperlinkError, ResolutionError, ResolutionReason};
pub use field::{AttributeField, Field};
pub use group::{HyperLinks, Hyperlink};
pub use link::{DEFAULT_METHOD, LinkField, RenderedLink};
pub use resolve::{Attributes, Resolve};
pub use schema::Schema;
pub use template::LinkTemplate;
pub use visibility::Visibility;
