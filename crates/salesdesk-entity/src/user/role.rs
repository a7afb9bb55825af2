//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Portal roles. Each role has its own navbar feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// System administrator.
    Admin,
    /// Sales representative; appears on the leaderboard.
    Sales,
    /// Marketing team member.
    Marketing,
    /// Project manager.
    ProjectManager,
    /// External collaborator.
    Collaborator,
    /// Client portal user.
    Client,
}

impl UserRole {
    /// Return the role as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Sales => "sales",
            Self::Marketing => "marketing",
            Self::ProjectManager => "project_manager",
            Self::Collaborator => "collaborator",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "sales" => Ok(Self::Sales),
            "marketing" => Ok(Self::Marketing),
            "project_manager" | "pm" => Ok(Self::ProjectManager),
            "collaborator" => Ok(Self::Collaborator),
            "client" => Ok(Self::Client),
            _ => Err(format!("Invalid role: '{s}'")),
        }
    }
}
