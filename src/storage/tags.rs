//! Tag table access
//!
//! Updating a resource's tags always replaces the whole set.

use crate::core::Tag;
use crate::error::Result;
use sqlx::sqlite::SqlitePool;
use sqlx::QueryBuilder;

/// Repository for tag rows
#[derive(Clone)]
pub struct TagRepository {
    pool: SqlitePool,
}

impl TagRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Tags attached to one resource
    pub async fn for_resource(&self, kind: &str, resource_id: i64) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT * FROM tags WHERE kind = ? AND resource_id = ? ORDER BY title",
        )
        .bind(kind)
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    /// Distinct titles in use, for form suggestions
    pub async fn all_titles(&self, kind: &str) -> Result<Vec<String>> {
        let titles = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT title FROM tags WHERE kind = ? ORDER BY title",
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(titles)
    }

    /// Replace the resource's tag set
    ///
    /// Blank and duplicate titles are dropped before insertion.
    pub async fn replace(&self, kind: &str, resource_id: i64, titles: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tags WHERE kind = ? AND resource_id = ?")
            .bind(kind)
            .bind(resource_id)
            .execute(&mut *tx)
            .await?;

        let mut seen = Vec::new();
        for title in titles {
            let title = title.trim();
            if title.is_empty() || seen.iter().any(|s: &String| s == title) {
                continue;
            }
            seen.push(title.to_string());
            sqlx::query("INSERT INTO tags (kind, title, resource_id) VALUES (?, ?, ?)")
                .bind(kind)
                .bind(title)
                .bind(resource_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Drop all tags on the given resources (destroy cascade)
    pub async fn delete_for_resources(&self, kind: &str, resource_ids: &[i64]) -> Result<()> {
        if resource_ids.is_empty() {
            return Ok(());
        }
        let mut qb = QueryBuilder::new("DELETE FROM tags WHERE kind = ");
        qb.push_bind(kind);
        qb.push(" AND resource_id IN (");
        let mut separated = qb.separated(", ");
        for id in resource_ids {
            separated.push_bind(id);
        }
        qb.push(")");
        qb.build().execute(&self.pool).await?;
        Ok(())
    }
}
