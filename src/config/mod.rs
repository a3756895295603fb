//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The resulting [`Config`] is built once at startup and passed into the
//! pipeline and provider constructors; nothing below reads the environment.
//!
//! # Example
//!
//! ```no_run
//! use seo_audit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("audit.toml")).unwrap();
//! println!("Audit deadline: {}s", config.audit.deadline_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AhrefsConfig, AuditConfig, BlockDetectionConfig, Config, ContentConfig, FetcherConfig,
    MozConfig, OutputConfig, PageSpeedConfig, ProvidersConfig, ScraperSourceConfig,
    SerpProviderConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
