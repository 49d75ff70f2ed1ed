//! Attachment records
//!
//! An attachment row points at a directory under the uploads store; the file
//! bytes themselves live on disk as `<uploads>/<directory>/<filename>`. The
//! `uniqueid` doubles as the directory name and the public download handle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an attachment hangs off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AttachmentParent {
    Ticket,
    Reply,
}

/// An uploaded file linked to a ticket or a reply
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attachment {
    pub id: i64,
    pub uniqueid: String,
    pub client_id: i64,
    pub resource_type: AttachmentParent,
    pub resource_id: i64,
    pub directory: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}
