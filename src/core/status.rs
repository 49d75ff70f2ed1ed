//! Ticket statuses
//!
//! Statuses are database records so deployments can add their own, but the
//! first four are seeded by the initial migration and the Closed id is
//! well-known: the closure event fires when a ticket transitions onto it.

use serde::{Deserialize, Serialize};

/// Seeded status: a new, unanswered ticket
pub const OPEN_STATUS_ID: i64 = 1;

/// Seeded status: resolved; transitioning onto this id records a closure
/// event and notifies the client's users
pub const CLOSED_STATUS_ID: i64 = 2;

/// Seeded status: the team has replied and the ball is with the client
pub const ANSWERED_STATUS_ID: i64 = 3;

/// A ticket status record, ordered by `position` in pickers and filters
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TicketStatus {
    pub id: i64,
    pub title: String,
    pub color: String,
    pub position: i64,
}
