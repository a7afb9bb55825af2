//! Notification entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use salesdesk_core::types::id::{NotificationId, UserId};

use super::kind::NotificationKind;
use super::priority::NotificationPriority;

/// A notification document as stored in the `notifications` collection.
///
/// Producers are not required to set `read` or `timestamp`; feeds fill
/// them in when normalising (see [`Notification::from_document`]). Some
/// role feeds store the read flag as `viewed`, which is accepted as an
/// alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDocument {
    /// Store-assigned identifier.
    pub id: NotificationId,
    /// The recipient. Never reassigned.
    pub user_id: UserId,
    /// Display text.
    #[serde(default)]
    pub message: String,
    /// Type tag.
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    /// Whether the recipient has seen this notification.
    #[serde(default, alias = "viewed", skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Related project, for link-through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Related lead, for link-through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
    /// Company name, for display grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Producer-assigned priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<NotificationPriority>,
}

/// A notification to be created by an external producer; the store
/// assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    /// The recipient.
    pub user_id: UserId,
    /// Display text.
    pub message: String,
    /// Type tag.
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    /// Creation time; left empty for a server-assigned timestamp.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Related project.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Related lead.
    #[serde(default)]
    pub lead_id: Option<String>,
    /// Company name.
    #[serde(default)]
    pub company: Option<String>,
    /// Priority.
    #[serde(default)]
    pub priority: Option<NotificationPriority>,
}

impl NotificationDraft {
    /// Create a draft with just a recipient, type, and message.
    pub fn new(
        user_id: UserId,
        kind: impl Into<NotificationKind>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            message: message.into(),
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Set an explicit timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the company.
    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Turn the draft into a stored, unread document.
    pub fn into_document(self, id: NotificationId) -> NotificationDocument {
        NotificationDocument {
            id,
            user_id: self.user_id,
            message: self.message,
            kind: self.kind,
            read: Some(false),
            timestamp: self.timestamp,
            project_id: self.project_id,
            lead_id: self.lead_id,
            company: self.company,
            priority: self.priority,
        }
    }
}

/// A normalised notification as shown in a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Store-assigned identifier.
    pub id: NotificationId,
    /// The recipient.
    pub user_id: UserId,
    /// Display text.
    pub message: String,
    /// Type tag.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Whether the recipient has seen this notification.
    pub read: bool,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Related project.
    pub project_id: Option<String>,
    /// Related lead.
    pub lead_id: Option<String>,
    /// Company name.
    pub company: Option<String>,
    /// Priority.
    pub priority: Option<NotificationPriority>,
}

impl Notification {
    /// Normalise a stored document. A missing timestamp becomes `now` and
    /// a missing read flag becomes `false`.
    pub fn from_document(doc: NotificationDocument, now: DateTime<Utc>) -> Self {
        Self {
            id: doc.id,
            user_id: doc.user_id,
            message: doc.message,
            kind: doc.kind,
            read: doc.read.unwrap_or(false),
            timestamp: doc.timestamp.unwrap_or(now),
            project_id: doc.project_id,
            lead_id: doc.lead_id,
            company: doc.company,
            priority: doc.priority,
        }
    }

    /// Check if the notification has not been read.
    pub fn is_unread(&self) -> bool {
        !self.read
    }
}
