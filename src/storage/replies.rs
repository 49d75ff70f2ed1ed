//! Reply table access

use crate::core::{Reply, ReplyKind, UserKind};
use crate::error::{HelpdeskError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqlitePool;

/// One thread entry with its author joined in for display
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReplyListItem {
    pub id: i64,
    pub ticket_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub user_kind: UserKind,
    pub text: String,
    pub kind: ReplyKind,
    pub created_at: DateTime<Utc>,
}

/// Repository for reply rows
#[derive(Clone)]
pub struct ReplyRepository {
    pool: SqlitePool,
}

impl ReplyRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a reply and return its id
    pub async fn create(&self, reply: &Reply) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO replies (ticket_id, client_id, user_id, text, kind, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(reply.ticket_id)
        .bind(reply.client_id)
        .bind(reply.user_id)
        .bind(&reply.text)
        .bind(reply.kind)
        .bind(reply.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Load a reply, failing with `ReplyNotFound` if missing
    pub async fn by_id(&self, id: i64) -> Result<Reply> {
        self.try_by_id(id)
            .await?
            .ok_or(HelpdeskError::ReplyNotFound { id })
    }

    /// Load a reply if it exists
    pub async fn try_by_id(&self, id: i64) -> Result<Option<Reply>> {
        let reply = sqlx::query_as::<_, Reply>("SELECT * FROM replies WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reply)
    }

    /// Thread for a ticket, oldest first
    ///
    /// Notes are internal; pass `include_notes = false` for client viewers.
    pub async fn for_ticket(
        &self,
        ticket_id: i64,
        include_notes: bool,
    ) -> Result<Vec<ReplyListItem>> {
        let kind_clause = if include_notes {
            ""
        } else {
            " AND r.kind = 'reply'"
        };
        let sql = format!(
            "SELECT r.id, r.ticket_id, r.user_id, \
             COALESCE(TRIM(u.first_name || ' ' || u.last_name), '') AS user_name, \
             COALESCE(u.kind, 'team') AS user_kind, \
             r.text, r.kind, r.created_at \
             FROM replies r \
             LEFT JOIN users u ON u.id = r.user_id \
             WHERE r.ticket_id = ?{kind_clause} \
             ORDER BY r.created_at ASC, r.id ASC"
        );
        let items = sqlx::query_as::<_, ReplyListItem>(&sql)
            .bind(ticket_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    /// Ids of all replies on a ticket (used by the destroy cascade)
    pub async fn ids_for_ticket(&self, ticket_id: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM replies WHERE ticket_id = ?")
            .bind(ticket_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    /// Replace the reply text
    pub async fn update_text(&self, id: i64, text: &str) -> Result<()> {
        sqlx::query("UPDATE replies SET text = ? WHERE id = ?")
            .bind(text)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete a reply row
    pub async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM replies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
