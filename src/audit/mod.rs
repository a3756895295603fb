//! Audit orchestration
//!
//! [`AuditPipeline`] drives one audit through the `fetching`, `analyzing`,
//! `scoring`, `enriching` and `completed` states. A performance measurement
//! that misses the foreground budget continues as an [`EnrichmentTask`].

mod background;
mod pipeline;

pub use background::EnrichmentTask;
pub use pipeline::{AuditPipeline, AuditRun};
