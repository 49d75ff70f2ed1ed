//! Queued outbound mail
//!
//! Handlers never talk SMTP directly: notification mail is written to the
//! queue table and a background task delivers it when SMTP is configured.
//! Deleting a reply purges its still-pending rows, so a retracted reply is
//! never mailed out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Queue resource type for mail about a ticket
pub const MAIL_RESOURCE_TICKET: &str = "ticket";

/// Queue resource type for mail about a ticket reply
pub const MAIL_RESOURCE_REPLY: &str = "ticket-reply";

/// Delivery state of a queued message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum QueuedMailStatus {
    #[default]
    Pending,
    Sent,
    Failed,
}

/// A queued outbound message
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QueuedMail {
    pub id: i64,
    pub recipient: String,
    pub subject: String,
    /// Rendered HTML body
    pub body: String,
    pub resource_type: String,
    pub resource_id: i64,
    pub status: QueuedMailStatus,
    pub created_at: DateTime<Utc>,
}
