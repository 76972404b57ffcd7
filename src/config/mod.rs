//! Configuration module for the harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so a run can be configured purely from the
//! command line; validation runs once the final configuration is assembled.
//!
//! # Example
//!
//! ```no_run
//! use tuoitre_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvesting {} categories", config.categories.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CategoryEntry, CategoryTarget, Config, CrawlerConfig, OutputConfig, SiteConfig,
    DEFAULT_COMMENT_APP_KEY,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, parse_config, parse_config_with_hash};
pub use validation::{validate, MAX_WORKERS, MIN_CATEGORIES, MIN_TOTAL_POSTS};
