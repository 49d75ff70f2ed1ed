//! Category table access

use crate::core::Category;
use crate::error::Result;
use sqlx::sqlite::SqlitePool;

/// Repository for category rows
#[derive(Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Categories of one kind, for form dropdowns
    pub async fn of_kind(&self, kind: &str) -> Result<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE kind = ? ORDER BY name")
                .bind(kind)
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    /// Load a category if it exists
    pub async fn by_id(&self, id: i64) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    /// Insert a category and return its id
    pub async fn create(&self, kind: &str, name: &str, imap_replies: bool) -> Result<i64> {
        let result =
            sqlx::query("INSERT INTO categories (kind, name, imap_replies) VALUES (?, ?, ?)")
                .bind(kind)
                .bind(name)
                .bind(imap_replies)
                .execute(&self.pool)
                .await?;
        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TICKET_CATEGORY_KIND;
    use crate::storage::Database;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, CategoryRepository) {
        let dir = TempDir::new().unwrap();
        let db = Database::connect(&dir.path().join("test.db")).await.unwrap();
        db.migrate().await.unwrap();
        (dir, CategoryRepository::new(db.pool().clone()))
    }

    #[tokio::test]
    async fn test_seeded_category_present() {
        let (_dir, repo) = setup().await;

        let categories = repo.of_kind(TICKET_CATEGORY_KIND).await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "General Support");
        assert!(!categories[0].imap_replies);
    }

    #[tokio::test]
    async fn test_create_with_imap_replies() {
        let (_dir, repo) = setup().await;

        let id = repo
            .create(TICKET_CATEGORY_KIND, "Email Desk", true)
            .await
            .unwrap();
        let category = repo.by_id(id).await.unwrap().unwrap();
        assert!(category.imap_replies);
    }
}
