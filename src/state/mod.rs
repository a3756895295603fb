//! State module for tracking audit progress
//!
//! # Components
//!
//! - `AuditState`: The pipeline stage of one audit (fetching, analyzing, scoring, etc.)

mod audit_state;

pub use audit_state::AuditState;
