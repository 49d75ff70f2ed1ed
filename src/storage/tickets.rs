//! Ticket table access
//!
//! Covers the ticket rows themselves, the seeded status table, and the
//! joined listing used by the index page. Event recording, replies and the
//! other satellites live in their own repositories.

use crate::core::{ActiveState, Priority, Ticket, TicketStatus};
use crate::error::{HelpdeskError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use sqlx::QueryBuilder;

/// Filters accepted by the ticket index
///
/// `viewer_id` feeds the per-user pinned column; `client_id` is set for
/// client users so they only ever see their own account's tickets.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub viewer_id: i64,
    pub client_id: Option<i64>,
    pub status_id: Option<i64>,
    pub category_id: Option<i64>,
    pub priority: Option<Priority>,
    pub active_state: ActiveState,
    pub search: Option<String>,
}

/// One row of the ticket index: ticket columns plus joined display fields
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TicketListItem {
    pub id: i64,
    pub subject: String,
    pub client_id: i64,
    pub status_id: i64,
    pub status_title: String,
    pub status_color: String,
    pub category_name: String,
    pub priority: Priority,
    pub source: crate::core::TicketSource,
    pub active_state: ActiveState,
    pub reply_count: i64,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

/// Editable ticket fields
///
/// Status changes ride along here so the update handler can detect the
/// transition to Closed against the previously loaded row.
#[derive(Debug, Clone)]
pub struct TicketUpdate {
    pub subject: String,
    pub body: String,
    pub category_id: i64,
    pub priority: Priority,
    pub status_id: i64,
}

/// Per-status ticket count for the stats widget
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StatusCount {
    pub id: i64,
    pub title: String,
    pub color: String,
    pub count: i64,
}

/// Repository for ticket rows and statuses
#[derive(Clone)]
pub struct TicketRepository {
    pool: SqlitePool,
}

impl TicketRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a ticket and return its id
    pub async fn create(&self, ticket: &Ticket) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO tickets (subject, body, client_id, creator_id, category_id, \
             status_id, priority, source, imap_sender_address, active_state, \
             created_at, last_updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&ticket.subject)
        .bind(&ticket.body)
        .bind(ticket.client_id)
        .bind(ticket.creator_id)
        .bind(ticket.category_id)
        .bind(ticket.status_id)
        .bind(ticket.priority)
        .bind(ticket.source)
        .bind(&ticket.imap_sender_address)
        .bind(ticket.active_state)
        .bind(ticket.created_at)
        .bind(ticket.last_updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Load a ticket, failing with `TicketNotFound` if missing
    pub async fn by_id(&self, id: i64) -> Result<Ticket> {
        self.try_by_id(id)
            .await?
            .ok_or(HelpdeskError::TicketNotFound { id })
    }

    /// Load a ticket if it exists
    pub async fn try_by_id(&self, id: i64) -> Result<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ticket)
    }

    /// Joined listing for the index page, pinned tickets first
    pub async fn list(&self, filter: &TicketFilter) -> Result<Vec<TicketListItem>> {
        let mut qb = QueryBuilder::new(
            "SELECT t.id, t.subject, t.client_id, t.status_id, \
             COALESCE(s.title, '') AS status_title, \
             COALESCE(s.color, '') AS status_color, \
             COALESCE(c.name, '') AS category_name, \
             t.priority, t.source, t.active_state, \
             (SELECT COUNT(*) FROM replies r WHERE r.ticket_id = t.id) AS reply_count, \
             EXISTS(SELECT 1 FROM pins p WHERE p.resource_type = 'ticket' \
                    AND p.resource_id = t.id AND p.user_id = ",
        );
        qb.push_bind(filter.viewer_id);
        qb.push(
            ") AS pinned, t.created_at, t.last_updated_at \
             FROM tickets t \
             LEFT JOIN ticket_statuses s ON s.id = t.status_id \
             LEFT JOIN categories c ON c.id = t.category_id \
             WHERE t.active_state = ",
        );
        qb.push_bind(filter.active_state);

        if let Some(client_id) = filter.client_id {
            qb.push(" AND t.client_id = ");
            qb.push_bind(client_id);
        }
        if let Some(status_id) = filter.status_id {
            qb.push(" AND t.status_id = ");
            qb.push_bind(status_id);
        }
        if let Some(category_id) = filter.category_id {
            qb.push(" AND t.category_id = ");
            qb.push_bind(category_id);
        }
        if let Some(priority) = filter.priority {
            qb.push(" AND t.priority = ");
            qb.push_bind(priority);
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            qb.push(" AND (t.subject LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR t.body LIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        qb.push(" ORDER BY pinned DESC, t.last_updated_at DESC");

        let items = qb
            .build_query_as::<TicketListItem>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    /// Apply the editable fields to an existing ticket
    pub async fn update(&self, id: i64, update: &TicketUpdate) -> Result<()> {
        sqlx::query(
            "UPDATE tickets SET subject = ?, body = ?, category_id = ?, \
             priority = ?, status_id = ? WHERE id = ?",
        )
        .bind(&update.subject)
        .bind(&update.body)
        .bind(update.category_id)
        .bind(update.priority)
        .bind(update.status_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Set the status of a single ticket
    pub async fn set_status(&self, id: i64, status_id: i64) -> Result<()> {
        sqlx::query("UPDATE tickets SET status_id = ? WHERE id = ?")
            .bind(status_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Set the status of several tickets, returning how many changed
    pub async fn set_status_bulk(&self, ids: &[i64], status_id: i64) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut qb = QueryBuilder::new("UPDATE tickets SET status_id = ");
        qb.push_bind(status_id);
        qb.push(" WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        qb.push(")");

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Archive or restore several tickets
    pub async fn set_active_state(&self, ids: &[i64], state: ActiveState) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut qb = QueryBuilder::new("UPDATE tickets SET active_state = ");
        qb.push_bind(state);
        qb.push(" WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        qb.push(")");

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Bump the last-updated timestamp (a customer-visible reply landed)
    pub async fn touch(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE tickets SET last_updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete the ticket row; replies and custom field values cascade
    pub async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM tickets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// All statuses in display order
    pub async fn statuses(&self) -> Result<Vec<TicketStatus>> {
        let statuses = sqlx::query_as::<_, TicketStatus>(
            "SELECT * FROM ticket_statuses ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(statuses)
    }

    /// Per-status counts of active tickets for the stats widget
    pub async fn status_counts(&self) -> Result<Vec<StatusCount>> {
        let counts = sqlx::query_as::<_, StatusCount>(
            "SELECT s.id, s.title, s.color, COUNT(t.id) AS count \
             FROM ticket_statuses s \
             LEFT JOIN tickets t ON t.status_id = s.id AND t.active_state = 'active' \
             GROUP BY s.id, s.title, s.color \
             ORDER BY s.position",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    /// Toggle the user's pin on a ticket, returning the new pinned state
    pub async fn toggle_pin(&self, user_id: i64, ticket_id: i64) -> Result<bool> {
        let removed = sqlx::query(
            "DELETE FROM pins WHERE user_id = ? AND resource_type = 'ticket' \
             AND resource_id = ?",
        )
        .bind(user_id)
        .bind(ticket_id)
        .execute(&self.pool)
        .await?;

        if removed.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO pins (user_id, resource_type, resource_id, created_at) \
             VALUES (?, 'ticket', ?, ?)",
        )
        .bind(user_id)
        .bind(ticket_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(true)
    }

    /// Drop every user's pins on the given tickets (destroy cascade)
    pub async fn delete_pins(&self, ticket_ids: &[i64]) -> Result<()> {
        if ticket_ids.is_empty() {
            return Ok(());
        }
        let mut qb =
            QueryBuilder::new("DELETE FROM pins WHERE resource_type = 'ticket' AND resource_id IN (");
        let mut separated = qb.separated(", ");
        for id in ticket_ids {
            separated.push_bind(id);
        }
        qb.push(")");
        qb.build().execute(&self.pool).await?;
        Ok(())
    }
}
