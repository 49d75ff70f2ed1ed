//! Settings table access (single row, id 1)

use crate::core::{ReplyingInterface, Settings};
use crate::error::Result;
use sqlx::sqlite::SqlitePool;

/// Repository for the settings row
#[derive(Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load the settings row; migrations guarantee it exists
    pub async fn load(&self) -> Result<Settings> {
        let settings = sqlx::query_as::<_, Settings>("SELECT * FROM settings WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(settings)
    }

    /// Update the theme name and custom CSS
    pub async fn update_theme(&self, theme_name: &str, theme_css: &str) -> Result<()> {
        sqlx::query("UPDATE settings SET theme_name = ?, theme_css = ? WHERE id = 1")
            .bind(theme_name)
            .bind(theme_css)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Update the ticket options
    pub async fn update_ticket_options(
        &self,
        replying_interface: ReplyingInterface,
        allow_edit_subject: bool,
        allow_edit_body: bool,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE settings SET tickets_replying_interface = ?, \
             tickets_allow_edit_subject = ?, tickets_allow_edit_body = ? WHERE id = 1",
        )
        .bind(replying_interface)
        .bind(allow_edit_subject)
        .bind(allow_edit_body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
