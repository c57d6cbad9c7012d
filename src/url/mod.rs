//! URL handling for pdf-trawler
//!
//! This module provides URL normalization, link resolution, crawl scope
//! checks and safe filename derivation.

mod filename;
mod normalize;
mod scope;

pub use filename::{filename_from_url, resolve_unique_path, sanitize_filename};
pub use normalize::{has_pdf_extension, normalize_url, resolve_link};
pub use scope::{domain_matches, CrawlScope, ScopeKind};
