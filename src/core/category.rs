//! Ticket categories

use serde::{Deserialize, Serialize};

/// Category type for ticket categories
pub const TICKET_CATEGORY_KIND: &str = "ticket";

/// A ticket category
///
/// `imap_replies` controls whether replies to email-sourced tickets in this
/// category are mailed back to the original sender address.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub kind: String,
    pub name: String,
    pub imap_replies: bool,
}
