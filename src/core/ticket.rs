//! Ticket record and its field enums

use crate::core::status::CLOSED_STATUS_ID;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a ticket entered the system
///
/// Email-sourced tickets remember the original sender address so replies can
/// be mailed back outside the web UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TicketSource {
    #[default]
    Web,
    Email,
}

/// Whether a ticket is live or archived
///
/// Archiving hides a ticket from the default listing without deleting
/// anything; restore flips it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ActiveState {
    #[default]
    Active,
    Archived,
}

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    /// Parse a priority from its lowercase name, falling back to `Normal`
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "low" => Self::Low,
            "high" => Self::High,
            "urgent" => Self::Urgent,
            _ => Self::Normal,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        };
        write!(f, "{name}")
    }
}

/// A customer support request record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ticket {
    pub id: i64,
    pub subject: String,
    pub body: String,
    pub client_id: i64,
    pub creator_id: i64,
    pub category_id: i64,
    pub status_id: i64,
    pub priority: Priority,
    pub source: TicketSource,
    pub imap_sender_address: Option<String>,
    pub active_state: ActiveState,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Whether the ticket currently carries the Closed status
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.status_id == CLOSED_STATUS_ID
    }

    /// Whether the ticket is archived
    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.active_state == ActiveState::Archived
    }
}
