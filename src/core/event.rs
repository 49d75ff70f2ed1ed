//! Events and per-user event tracking
//!
//! Every noteworthy ticket action records one event. Tracking rows fan the
//! event out to the affected users: each row carries an unread/read flag for
//! the timeline, and the set of tracked users is also the mail audience.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The ticket actions that produce events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum EventAction {
    OpenedTicket,
    ClosedTicket,
    RepliedTicket,
}

/// Read state of a tracking row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TrackingStatus {
    #[default]
    Unread,
    Read,
}

/// A recorded ticket action
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: i64,
    pub creator_id: i64,
    pub action: EventAction,
    /// Resource type the event describes; always "ticket" in this module
    pub item: String,
    pub item_id: i64,
    /// Free-text payload: the subject for open/close, the reply text for replies
    pub content: String,
    pub parent_title: String,
    pub client_id: i64,
    pub show_in_timeline: bool,
    pub created_at: DateTime<Utc>,
}

/// A per-user notification row for an event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventTracking {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub parent_type: String,
    pub parent_id: i64,
    pub status: TrackingStatus,
    pub created_at: DateTime<Utc>,
}
