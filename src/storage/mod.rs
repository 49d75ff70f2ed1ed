//! `SQLite`-backed persistence
//!
//! [`Database`] owns the connection pool and runs the embedded migrations.
//! Each repository type wraps the pool for one table family; handlers talk
//! to repositories, never to raw queries.

mod attachments;
mod categories;
mod custom_fields;
mod email_queue;
mod events;
mod replies;
mod seed;
mod settings;
mod tags;
mod tickets;
mod users;

pub use attachments::AttachmentRepository;
pub use categories::CategoryRepository;
pub use custom_fields::{CustomFieldRepository, FieldValue};
pub use email_queue::EmailQueueRepository;
pub use events::EventRepository;
pub use replies::{ReplyListItem, ReplyRepository};
pub use seed::{seed_demo_data, SeededUser};
pub use settings::SettingsRepository;
pub use tags::TagRepository;
pub use tickets::{StatusCount, TicketFilter, TicketListItem, TicketRepository, TicketUpdate};
pub use users::{SessionRepository, UserRepository};

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

/// Connection pool plus migration runner
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database file and build the pool
    pub async fn connect(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Apply any pending migrations embedded at compile time
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Access the underlying pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_connect_creates_file_and_migrates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("helpdesk.db");

        let db = Database::connect(&path).await.unwrap();
        db.migrate().await.unwrap();
        assert!(path.exists());

        // Seeded statuses are present after migration.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ticket_statuses")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("helpdesk.db");

        let db = Database::connect(&path).await.unwrap();
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();
    }
}
