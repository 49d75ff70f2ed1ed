//! Ticket reply record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Distinguishes customer-visible replies from internal notes
///
/// Notes never record events, never change the ticket status, and never
/// trigger mail fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ReplyKind {
    #[default]
    Reply,
    Note,
}

/// A message attached to a ticket thread
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reply {
    pub id: i64,
    pub ticket_id: i64,
    pub client_id: i64,
    pub user_id: i64,
    pub text: String,
    pub kind: ReplyKind,
    pub created_at: DateTime<Utc>,
}

impl Reply {
    /// Whether this entry participates in events and mail fan-out
    #[must_use]
    pub fn is_customer_visible(&self) -> bool {
        self.kind == ReplyKind::Reply
    }
}
