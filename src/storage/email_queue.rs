//! Outbound mail queue access
//!
//! Handlers enqueue; the flusher task drains pending rows. Deleting a reply
//! purges its still-pending mail so edits cannot leak stale text.

use crate::core::{QueuedMail, QueuedMailStatus};
use crate::error::Result;
use sqlx::sqlite::SqlitePool;

/// Repository for queued mail rows
#[derive(Clone)]
pub struct EmailQueueRepository {
    pool: SqlitePool,
}

impl EmailQueueRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a pending mail row and return its id
    pub async fn enqueue(&self, mail: &QueuedMail) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO email_queue (recipient, subject, body, resource_type, \
             resource_id, status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&mail.recipient)
        .bind(&mail.subject)
        .bind(&mail.body)
        .bind(&mail.resource_type)
        .bind(mail.resource_id)
        .bind(QueuedMailStatus::Pending)
        .bind(mail.created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Oldest pending rows, up to `limit`
    pub async fn pending(&self, limit: i64) -> Result<Vec<QueuedMail>> {
        let rows = sqlx::query_as::<_, QueuedMail>(
            "SELECT * FROM email_queue WHERE status = ? ORDER BY id LIMIT ?",
        )
        .bind(QueuedMailStatus::Pending)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Record a delivery attempt's outcome
    pub async fn mark(&self, id: i64, status: QueuedMailStatus) -> Result<()> {
        sqlx::query("UPDATE email_queue SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// All rows recorded against one resource, oldest first
    pub async fn for_resource(
        &self,
        resource_type: &str,
        resource_id: i64,
    ) -> Result<Vec<QueuedMail>> {
        let rows = sqlx::query_as::<_, QueuedMail>(
            "SELECT * FROM email_queue WHERE resource_type = ? AND resource_id = ? ORDER BY id",
        )
        .bind(resource_type)
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Purge pending (not yet sent) mail for one resource
    pub async fn delete_pending_for_resource(
        &self,
        resource_type: &str,
        resource_id: i64,
    ) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM email_queue WHERE resource_type = ? AND resource_id = ? AND status = ?",
        )
        .bind(resource_type)
        .bind(resource_id)
        .bind(QueuedMailStatus::Pending)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MAIL_RESOURCE_REPLY;
    use crate::storage::Database;
    use chrono::Utc;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, EmailQueueRepository) {
        let dir = TempDir::new().unwrap();
        let db = Database::connect(&dir.path().join("test.db")).await.unwrap();
        db.migrate().await.unwrap();
        (dir, EmailQueueRepository::new(db.pool().clone()))
    }

    fn sample(resource_id: i64) -> QueuedMail {
        QueuedMail {
            id: 0,
            recipient: "client@example.com".to_string(),
            subject: "New reply".to_string(),
            body: "<p>hello</p>".to_string(),
            resource_type: MAIL_RESOURCE_REPLY.to_string(),
            resource_id,
            status: QueuedMailStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_enqueue_and_drain() {
        let (_dir, repo) = setup().await;

        let id = repo.enqueue(&sample(1)).await.unwrap();
        repo.enqueue(&sample(2)).await.unwrap();

        let pending = repo.pending(10).await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, id);

        repo.mark(id, QueuedMailStatus::Sent).await.unwrap();
        let pending = repo.pending(10).await.unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn test_purge_only_removes_pending() {
        let (_dir, repo) = setup().await;

        let sent = repo.enqueue(&sample(5)).await.unwrap();
        repo.mark(sent, QueuedMailStatus::Sent).await.unwrap();
        repo.enqueue(&sample(5)).await.unwrap();

        let purged = repo
            .delete_pending_for_resource(MAIL_RESOURCE_REPLY, 5)
            .await
            .unwrap();
        assert_eq!(purged, 1);

        let remaining = repo.for_resource(MAIL_RESOURCE_REPLY, 5).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].status, QueuedMailStatus::Sent);
    }
}
