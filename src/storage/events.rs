//! Event and event-tracking table access
//!
//! An event is recorded once; tracking rows fan it out per user and double
//! as the unread markers cleared when a ticket is opened.

use crate::core::{Event, EventTracking, TrackingStatus};
use crate::error::Result;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use sqlx::QueryBuilder;

/// Repository for events and their tracking rows
#[derive(Clone)]
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record an event and fan it out to the tracked users
    ///
    /// Returns the event id. Tracking rows start unread.
    pub async fn record(&self, event: &Event, tracked_user_ids: &[i64]) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO events (creator_id, action, item, item_id, content, \
             parent_title, client_id, show_in_timeline, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(event.creator_id)
        .bind(event.action)
        .bind(&event.item)
        .bind(event.item_id)
        .bind(&event.content)
        .bind(&event.parent_title)
        .bind(event.client_id)
        .bind(event.show_in_timeline)
        .bind(event.created_at)
        .execute(&mut *tx)
        .await?;
        let event_id = result.last_insert_rowid();

        for user_id in tracked_user_ids {
            sqlx::query(
                "INSERT INTO event_tracking (event_id, user_id, parent_type, parent_id, \
                 status, created_at) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(event_id)
            .bind(user_id)
            .bind(&event.item)
            .bind(event.item_id)
            .bind(TrackingStatus::Unread)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(event_id)
    }

    /// Events recorded against one item, newest first
    pub async fn for_item(&self, item: &str, item_id: i64) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE item = ? AND item_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(item)
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    /// Tracking rows for one user on one item
    pub async fn tracking_for_user(
        &self,
        parent_type: &str,
        parent_id: i64,
        user_id: i64,
    ) -> Result<Vec<EventTracking>> {
        let rows = sqlx::query_as::<_, EventTracking>(
            "SELECT * FROM event_tracking WHERE parent_type = ? AND parent_id = ? \
             AND user_id = ? ORDER BY id",
        )
        .bind(parent_type)
        .bind(parent_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Mark every tracking row on an item read for one user
    pub async fn mark_read(&self, parent_type: &str, parent_id: i64, user_id: i64) -> Result<()> {
        sqlx::query(
            "UPDATE event_tracking SET status = ? WHERE parent_type = ? AND parent_id = ? \
             AND user_id = ?",
        )
        .bind(TrackingStatus::Read)
        .bind(parent_type)
        .bind(parent_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Drop all events (and, via cascade, tracking rows) on the given items
    pub async fn delete_for_items(&self, item: &str, item_ids: &[i64]) -> Result<()> {
        if item_ids.is_empty() {
            return Ok(());
        }
        let mut qb = QueryBuilder::new("DELETE FROM events WHERE item = ");
        qb.push_bind(item);
        qb.push(" AND item_id IN (");
        let mut separated = qb.separated(", ");
        for id in item_ids {
            separated.push_bind(id);
        }
        qb.push(")");
        qb.build().execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EventAction, EventBuilder, TicketBuilder};
    use crate::storage::Database;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, EventRepository) {
        let dir = TempDir::new().unwrap();
        let db = Database::connect(&dir.path().join("test.db")).await.unwrap();
        db.migrate().await.unwrap();
        (dir, EventRepository::new(db.pool().clone()))
    }

    fn opened_event(ticket_id: i64) -> Event {
        let mut ticket = TicketBuilder::new().subject("New request").client_id(3).build();
        ticket.id = ticket_id;
        EventBuilder::new(1, EventAction::OpenedTicket)
            .ticket(&ticket)
            .content(&ticket.subject)
            .build()
    }

    #[tokio::test]
    async fn test_record_fans_out_tracking() {
        let (_dir, repo) = setup().await;

        repo.record(&opened_event(9), &[4, 5]).await.unwrap();

        let events = repo.for_item("ticket", 9).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, EventAction::OpenedTicket);

        let for_user = repo.tracking_for_user("ticket", 9, 4).await.unwrap();
        assert_eq!(for_user.len(), 1);
        assert_eq!(for_user[0].status, TrackingStatus::Unread);
    }

    #[tokio::test]
    async fn test_mark_read_only_touches_one_user() {
        let (_dir, repo) = setup().await;

        repo.record(&opened_event(9), &[4, 5]).await.unwrap();
        repo.mark_read("ticket", 9, 4).await.unwrap();

        let read = repo.tracking_for_user("ticket", 9, 4).await.unwrap();
        assert_eq!(read[0].status, TrackingStatus::Read);

        let unread = repo.tracking_for_user("ticket", 9, 5).await.unwrap();
        assert_eq!(unread[0].status, TrackingStatus::Unread);
    }

    #[tokio::test]
    async fn test_delete_for_items_cascades_tracking() {
        let (_dir, repo) = setup().await;

        repo.record(&opened_event(9), &[4]).await.unwrap();
        repo.delete_for_items("ticket", &[9]).await.unwrap();

        assert!(repo.for_item("ticket", 9).await.unwrap().is_empty());
        assert!(repo.tracking_for_user("ticket", 9, 4).await.unwrap().is_empty());
    }
}
