//! Robots.txt handling module
//!
//! Parsed robots.txt content feeds two technical signals: whether search
//! engines may crawl the site root, and which sitemaps the site declares.

mod parser;

pub use parser::{ParsedRobots, SEARCH_ENGINE_AGENT};
