//! Site schemas
//!
//! A [`SiteSchema`] captures the settings that work best for one website:
//! filename and URL patterns, sort order, merged file name, crawl depth and
//! request delay. Schemas are declared as `[[schema]]` tables in the config
//! file and collected in a [`SchemaRegistry`], which picks one by name or by
//! matching the seed URL.
//!
//! # Example
//!
//! ```
//! use pdf_trawler::schema::{SchemaRegistry, SiteSchema};
//!
//! let registry = SchemaRegistry::from_schemas([
//!     SiteSchema::new("springer_book", r"https://link\.springer\.com/book/.*").unwrap(),
//! ])
//! .unwrap();
//!
//! let schema = registry.detect("https://link.springer.com/book/10.1007/978-3-031-41026-0");
//! assert_eq!(schema.map(|s| s.name()), Some("springer_book"));
//! ```

mod registry;
mod site;

pub use registry::SchemaRegistry;
pub use site::{SchemaSpec, SiteSchema};

use thiserror::Error;

/// Errors from defining or registering schemas
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema name cannot be empty")]
    EmptyName,

    #[error("invalid url-pattern in schema '{name}': {source}")]
    InvalidRegex {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("schema '{0}' is already registered")]
    Duplicate(String),
}
