//! Resource tags

use serde::{Deserialize, Serialize};

/// Tag type for ticket tags; kept as a column so other CRM resources can
/// share the table
pub const TICKET_TAG_KIND: &str = "ticket";

/// A tag applied to a resource
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub kind: String,
    pub title: String,
    pub resource_id: i64,
}
