//! Notification type tag.

use serde::{Deserialize, Serialize};

/// Open-ended notification type. Unknown tags are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    /// A new or updated lead.
    Lead,
    /// An alert requiring attention.
    Alert,
    /// A general status update.
    Update,
    /// The recipient was assigned to a project.
    ProjectAssignment,
    /// Any other producer-defined tag.
    Other(String),
}

impl NotificationKind {
    /// Return the tag as stored.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Lead => "lead",
            Self::Alert => "alert",
            Self::Update => "update",
            Self::ProjectAssignment => "project_assignment",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for NotificationKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "lead" => Self::Lead,
            "alert" => Self::Alert,
            "update" => Self::Update,
            "project_assignment" => Self::ProjectAssignment,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for NotificationKind {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl Default for NotificationKind {
    fn default() -> Self {
        Self::Update
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
