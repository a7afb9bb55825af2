//! Deal pipeline status.

use serde::{Deserialize, Serialize};

/// Pipeline stage of a deal. Stages other than the two closed outcomes
/// are kept as free-form strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DealStatus {
    /// The deal was won; its budget counts toward revenue.
    ClosedWon,
    /// The deal was lost.
    ClosedLost,
    /// Any open stage ("new", "qualified", "proposal", ...).
    Open(String),
}

impl DealStatus {
    /// Return the status as stored.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClosedWon => "closed-won",
            Self::ClosedLost => "closed-lost",
            Self::Open(stage) => stage,
        }
    }

    /// Whether the deal counts as closed for the leaderboard.
    pub fn is_won(&self) -> bool {
        matches!(self, Self::ClosedWon)
    }
}

impl From<String> for DealStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "closed-won" => Self::ClosedWon,
            "closed-lost" => Self::ClosedLost,
            _ => Self::Open(s),
        }
    }
}

impl From<DealStatus> for String {
    fn from(status: DealStatus) -> Self {
        status.as_str().to_string()
    }
}
