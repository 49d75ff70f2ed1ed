//! Custom ticket fields
//!
//! Deployments can bolt extra fields onto the ticket form. Values are stored
//! per ticket in a key/value table; required enabled fields participate in
//! store-time validation.

use serde::{Deserialize, Serialize};

/// A custom field definition
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomField {
    pub id: i64,
    /// Machine name used as the payload key and the value-table key
    pub name: String,
    /// Human label shown on forms and in validation messages
    pub title: String,
    pub required: bool,
    pub enabled: bool,
    pub position: i64,
}

impl CustomField {
    /// Whether this field must be present and non-empty on store
    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        self.required && self.enabled
    }
}
