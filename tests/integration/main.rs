//! Integration tests for seo-audit
//!
//! Network-facing pieces run against wiremock servers; the pipeline runs
//! against in-process stub sources.

mod fetch_tests;
mod fixtures;
mod pipeline_tests;
mod provider_tests;
mod storage_tests;
