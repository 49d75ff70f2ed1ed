//! Attachment table access
//!
//! Rows reference files on disk at `<uploads>/<directory>/<filename>`.
//! Uploads land on disk first; rows are created when the owning ticket or
//! reply is stored. Deleting rows never touches the disk, that is the
//! file store's job.

use crate::core::{Attachment, AttachmentParent};
use crate::error::{HelpdeskError, Result};
use sqlx::sqlite::SqlitePool;
use sqlx::QueryBuilder;

/// Repository for attachment rows
#[derive(Clone)]
pub struct AttachmentRepository {
    pool: SqlitePool,
}

impl AttachmentRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an attachment row and return its id
    pub async fn create(&self, attachment: &Attachment) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO attachments (uniqueid, client_id, resource_type, resource_id, \
             directory, filename, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&attachment.uniqueid)
        .bind(attachment.client_id)
        .bind(attachment.resource_type)
        .bind(attachment.resource_id)
        .bind(&attachment.directory)
        .bind(&attachment.filename)
        .bind(attachment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Look up an attachment by its public unique id
    pub async fn by_uniqueid(&self, uniqueid: &str) -> Result<Attachment> {
        let attachment =
            sqlx::query_as::<_, Attachment>("SELECT * FROM attachments WHERE uniqueid = ?")
                .bind(uniqueid)
                .fetch_optional(&self.pool)
                .await?;
        attachment.ok_or_else(|| HelpdeskError::FileNotFound {
            uniqueid: uniqueid.to_string(),
        })
    }

    /// All attachments on a ticket or reply
    pub async fn for_resource(
        &self,
        resource: AttachmentParent,
        resource_id: i64,
    ) -> Result<Vec<Attachment>> {
        let attachments = sqlx::query_as::<_, Attachment>(
            "SELECT * FROM attachments WHERE resource_type = ? AND resource_id = ? \
             ORDER BY id",
        )
        .bind(resource)
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attachments)
    }

    /// Delete one attachment row
    pub async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM attachments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete every attachment row on the given resources, returning the
    /// removed rows so the caller can clean up their files
    pub async fn delete_for_resources(
        &self,
        resource: AttachmentParent,
        resource_ids: &[i64],
    ) -> Result<Vec<Attachment>> {
        if resource_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb =
            QueryBuilder::new("SELECT * FROM attachments WHERE resource_type = ");
        qb.push_bind(resource);
        qb.push(" AND resource_id IN (");
        let mut separated = qb.separated(", ");
        for id in resource_ids {
            separated.push_bind(id);
        }
        qb.push(")");

        let removed = qb
            .build_query_as::<Attachment>()
            .fetch_all(&self.pool)
            .await?;

        let mut qb = QueryBuilder::new("DELETE FROM attachments WHERE resource_type = ");
        qb.push_bind(resource);
        qb.push(" AND resource_id IN (");
        let mut separated = qb.separated(", ");
        for id in resource_ids {
            separated.push_bind(id);
        }
        qb.push(")");
        qb.build().execute(&self.pool).await?;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use chrono::Utc;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, AttachmentRepository) {
        let dir = TempDir::new().unwrap();
        let db = Database::connect(&dir.path().join("test.db")).await.unwrap();
        db.migrate().await.unwrap();
        (dir, AttachmentRepository::new(db.pool().clone()))
    }

    fn sample(uniqueid: &str, resource_id: i64) -> Attachment {
        Attachment {
            id: 0,
            uniqueid: uniqueid.to_string(),
            client_id: 1,
            resource_type: AttachmentParent::Ticket,
            resource_id,
            directory: "upload-dir".to_string(),
            filename: "report.pdf".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let (_dir, repo) = setup().await;

        repo.create(&sample("abc123", 7)).await.unwrap();
        let found = repo.by_uniqueid("abc123").await.unwrap();
        assert_eq!(found.filename, "report.pdf");
        assert_eq!(found.resource_id, 7);
    }

    #[tokio::test]
    async fn test_missing_uniqueid_is_file_not_found() {
        let (_dir, repo) = setup().await;

        let err = repo.by_uniqueid("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_for_resources_returns_removed_rows() {
        let (_dir, repo) = setup().await;

        repo.create(&sample("a1", 7)).await.unwrap();
        repo.create(&sample("a2", 7)).await.unwrap();
        repo.create(&sample("kept", 8)).await.unwrap();

        let removed = repo
            .delete_for_resources(AttachmentParent::Ticket, &[7])
            .await
            .unwrap();
        assert_eq!(removed.len(), 2);

        assert!(repo.by_uniqueid("a1").await.is_err());
        assert!(repo.by_uniqueid("kept").await.is_ok());

        let none = repo
            .delete_for_resources(AttachmentParent::Ticket, &[])
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
