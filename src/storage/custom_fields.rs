//! Custom field definitions and per-ticket values

use crate::core::CustomField;
use crate::error::Result;
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use std::collections::HashMap;

/// A stored value joined with its field's display title
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FieldValue {
    pub name: String,
    pub title: String,
    pub value: String,
}

/// Repository for custom field definitions and values
#[derive(Clone)]
pub struct CustomFieldRepository {
    pool: SqlitePool,
}

impl CustomFieldRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Enabled fields in display order; these drive the create form and
    /// its validation
    pub async fn enabled(&self) -> Result<Vec<CustomField>> {
        let fields = sqlx::query_as::<_, CustomField>(
            "SELECT * FROM custom_fields WHERE enabled = 1 ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(fields)
    }

    /// Insert a field definition and return its id
    pub async fn create(&self, field: &CustomField) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO custom_fields (name, title, required, enabled, position) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&field.name)
        .bind(&field.title)
        .bind(field.required)
        .bind(field.enabled)
        .bind(field.position)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Values stored on a ticket, joined with field titles, in field order
    pub async fn values_for_ticket(&self, ticket_id: i64) -> Result<Vec<FieldValue>> {
        let values = sqlx::query_as::<_, FieldValue>(
            "SELECT v.field_name AS name, COALESCE(f.title, v.field_name) AS title, v.value \
             FROM custom_field_values v \
             LEFT JOIN custom_fields f ON f.name = v.field_name \
             WHERE v.ticket_id = ? \
             ORDER BY COALESCE(f.position, 0)",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(values)
    }

    /// Upsert the given values onto a ticket
    pub async fn save_values(
        &self,
        ticket_id: i64,
        values: &HashMap<String, String>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for (name, value) in values {
            sqlx::query(
                "INSERT OR REPLACE INTO custom_field_values (ticket_id, field_name, value) \
                 VALUES (?, ?, ?)",
            )
            .bind(ticket_id)
            .bind(name)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TicketBuilder;
    use crate::storage::{Database, TicketRepository};
    use tempfile::TempDir;

    async fn setup() -> (TempDir, CustomFieldRepository, i64) {
        let dir = TempDir::new().unwrap();
        let db = Database::connect(&dir.path().join("test.db")).await.unwrap();
        db.migrate().await.unwrap();
        let tickets = TicketRepository::new(db.pool().clone());
        let ticket_id = tickets
            .create(
                &TicketBuilder::new()
                    .subject("carrier")
                    .client_id(1)
                    .creator_id(1)
                    .category_id(1)
                    .build(),
            )
            .await
            .unwrap();
        (dir, CustomFieldRepository::new(db.pool().clone()), ticket_id)
    }

    fn field(name: &str, required: bool, enabled: bool, position: i64) -> CustomField {
        CustomField {
            id: 0,
            name: name.to_string(),
            title: name.to_uppercase(),
            required,
            enabled,
            position,
        }
    }

    #[tokio::test]
    async fn test_enabled_skips_disabled_fields() {
        let (_dir, repo, _) = setup().await;

        repo.create(&field("serial_number", true, true, 1)).await.unwrap();
        repo.create(&field("legacy_ref", false, false, 2)).await.unwrap();

        let enabled = repo.enabled().await.unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].name, "serial_number");
        assert!(enabled[0].is_mandatory());
    }

    #[tokio::test]
    async fn test_save_and_read_values() {
        let (_dir, repo, ticket_id) = setup().await;

        repo.create(&field("serial_number", true, true, 1)).await.unwrap();

        let mut values = HashMap::new();
        values.insert("serial_number".to_string(), "SN-100".to_string());
        repo.save_values(ticket_id, &values).await.unwrap();

        let stored = repo.values_for_ticket(ticket_id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "SERIAL_NUMBER");
        assert_eq!(stored[0].value, "SN-100");

        // Same field again replaces the value.
        values.insert("serial_number".to_string(), "SN-200".to_string());
        repo.save_values(ticket_id, &values).await.unwrap();
        let stored = repo.values_for_ticket(ticket_id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].value, "SN-200");
    }
}
