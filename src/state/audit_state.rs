/// Audit state definitions for tracking pipeline progress
///
/// An audit moves `Fetching → Analyzing → Scoring → Enriching → Completed`,
/// or into `Failed` from any active state.
use std::fmt;

/// Represents the current stage of an audit run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditState {
    // ===== Active States =====
    /// Homepage request in flight
    Fetching,

    /// Analyzers and site probes running
    Analyzing,

    /// Scores and issues being computed
    Scoring,

    /// Performance, backlink and ranking providers running
    Enriching,

    // ===== Terminal States =====
    /// Result assembled and persisted
    Completed,

    /// Fetch failed, page blocked, auth required or content insufficient
    Failed,
}

impl AuditState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the audit is still running
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if moving from `self` to `next` follows the pipeline order
    pub fn can_transition_to(&self, next: AuditState) -> bool {
        match (self, next) {
            (Self::Fetching, Self::Analyzing)
            | (Self::Analyzing, Self::Scoring)
            | (Self::Scoring, Self::Enriching)
            | (Self::Enriching, Self::Scoring)
            | (Self::Scoring, Self::Completed)
            | (Self::Enriching, Self::Completed) => true,
            (current, Self::Failed) => current.is_active(),
            _ => false,
        }
    }

    /// Converts the audit state to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Analyzing => "analyzing",
            Self::Scoring => "scoring",
            Self::Enriching => "enriching",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parses an audit state from a database string representation
    ///
    /// Returns None if the string doesn't match any known state.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "fetching" => Some(Self::Fetching),
            "analyzing" => Some(Self::Analyzing),
            "scoring" => Some(Self::Scoring),
            "enriching" => Some(Self::Enriching),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns all possible audit states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Fetching,
            Self::Analyzing,
            Self::Scoring,
            Self::Enriching,
            Self::Completed,
            Self::Failed,
        ]
    }
}

impl fmt::Display for AuditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
