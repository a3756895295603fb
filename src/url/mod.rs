//! URL handling module
//!
//! This module provides audit-input normalization, domain extraction and
//! site matching (used for internal-link accounting and rank lookups).

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, is_internal, origin_url};
pub use matcher::matches_site;
pub use normalize::{leading_label, normalize_domain, site_domain};
