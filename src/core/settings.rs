//! Application settings record
//!
//! A single-row table: theme options plus the ticket-module switches from the
//! settings screens.

use serde::{Deserialize, Serialize};

/// How agents compose replies in the ticket view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ReplyingInterface {
    Popup,
    #[default]
    Inline,
}

/// The settings row (id is always 1)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Settings {
    pub id: i64,
    pub theme_name: String,
    /// Custom CSS appended to every page; `<style>` tags are stripped on save
    pub theme_css: String,
    pub tickets_replying_interface: ReplyingInterface,
    pub tickets_allow_edit_subject: bool,
    pub tickets_allow_edit_body: bool,
}
