//! Error types for the helpdesk service
//!
//! All fallible operations in the crate return [`Result`], which wraps
//! [`HelpdeskError`]. The web layer maps these onto HTTP responses; the CLI
//! prints the user-facing message.

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, HelpdeskError>;

/// Errors that can occur in the helpdesk service
#[derive(Debug, Error)]
pub enum HelpdeskError {
    /// Database query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Filesystem failure (attachment store, config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Template rendering failure
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// Configuration loading failure
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// JSON serialization failure (CLI output)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Mail message assembly failure
    #[error("Mail error: {0}")]
    Mail(#[from] lettre::error::Error),

    /// Invalid mail address in configuration or user record
    #[error("Invalid mail address: {0}")]
    MailAddress(#[from] lettre::address::AddressError),

    /// SMTP delivery failure
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Password hashing or verification failure
    #[error("Password error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    /// Ticket lookup failed
    #[error("Ticket not found")]
    TicketNotFound { id: i64 },

    /// Reply lookup failed
    #[error("Reply not found")]
    ReplyNotFound { id: i64 },

    /// Attachment record or file is missing
    #[error("File not found")]
    FileNotFound { uniqueid: String },

    /// Request validation failed; the payload is an HTML `<li>` error list
    #[error("Validation failed")]
    Validation(String),

    /// No authenticated session on a protected route
    #[error("Authentication required")]
    Unauthorized,

    /// Login with a bad email/password pair
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// A write the handler could not attribute to a specific cause
    #[error("The request could not be completed")]
    RequestFailed,

    /// Catch-all for ad hoc errors
    #[error("{0}")]
    Custom(String),
}

impl HelpdeskError {
    /// Create a custom error from any displayable value
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Whether this error maps to a missing-resource condition
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TicketNotFound { .. } | Self::ReplyNotFound { .. } | Self::FileNotFound { .. }
        )
    }

    /// Message safe to show to an end user
    ///
    /// Internal failures (database, IO, templates, mail) collapse to a
    /// generic message; the full error is logged server-side.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::TicketNotFound { .. }
            | Self::ReplyNotFound { .. }
            | Self::FileNotFound { .. }
            | Self::Unauthorized
            | Self::InvalidCredentials
            | Self::RequestFailed
            | Self::Custom(_) => self.to_string(),
            Self::Validation(list) => list.clone(),
            _ => "The request could not be completed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(HelpdeskError::TicketNotFound { id: 7 }.is_not_found());
        assert!(
            HelpdeskError::FileNotFound {
                uniqueid: "abc".to_string()
            }
            .is_not_found()
        );
        assert!(!HelpdeskError::RequestFailed.is_not_found());
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = HelpdeskError::custom("visible to users");
        assert_eq!(err.user_message(), "visible to users");

        let io = HelpdeskError::Io(std::io::Error::other("disk on fire"));
        assert_eq!(io.user_message(), "The request could not be completed");
    }

    #[test]
    fn test_validation_carries_error_list() {
        let err = HelpdeskError::Validation("<li>Subject is required</li>".to_string());
        assert!(err.user_message().contains("<li>"));
    }
}
