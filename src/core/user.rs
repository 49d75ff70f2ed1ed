//! User records
//!
//! Two kinds of user share the table: team members (agents) and client users.
//! Client users belong to a client company and only ever see that client's
//! tickets; the kind also decides which side of the fence notification
//! fan-out targets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the helpdesk a user sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserKind {
    #[default]
    Team,
    Client,
}

impl fmt::Display for UserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Team => write!(f, "team"),
            Self::Client => write!(f, "client"),
        }
    }
}

/// An authenticated user of the service
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub kind: UserKind,
    /// Set for client users; the client company they belong to
    pub client_id: Option<i64>,
    pub theme: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether this user is a team member
    #[must_use]
    pub fn is_team(&self) -> bool {
        self.kind == UserKind::Team
    }

    /// Whether this user is a client user
    #[must_use]
    pub fn is_client(&self) -> bool {
        self.kind == UserKind::Client
    }

    /// Display name used in mail and timelines
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
