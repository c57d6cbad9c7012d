//! Configuration module for pdf-trawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use pdf_trawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("trawler.toml")).unwrap();
//! println!("Writing PDFs to {}", config.output.write_dir.display());
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, CrawlerConfig, OutputConfig, OutputMode, SortBy, UserAgentConfig, MAX_RECURSION_DEPTH,
};

pub use parser::{load_config, parse_config};
