//! Service configuration
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then `HELPDESK_*` environment variables. A fresh checkout runs with no
//! config file at all, which is also how the test suite uses it.

use crate::error::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration for the service
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSection,
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub storage: StorageSection,
    pub mail: MailSection,
}

/// Application identity, used in page titles and mail bodies
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    pub name: String,
    /// Public base URL, used to build links in notification mail
    pub url: String,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSection {
    /// Path to the SQLite database file; created on first run
    pub path: PathBuf,
}

/// Attachment storage settings
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    /// Directory holding one subdirectory per uploaded attachment
    pub uploads_dir: PathBuf,
}

/// Outbound mail settings
///
/// When `enabled` is false, notification mail stays queued in the database
/// and nothing is delivered. That is the default, and what tests rely on.
#[derive(Debug, Clone, Deserialize)]
pub struct MailSection {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub from_name: String,
}

impl AppConfig {
    /// Load configuration from defaults, an optional file, and the environment
    ///
    /// Environment variables use the `HELPDESK_` prefix with `__` between
    /// section and key, e.g. `HELPDESK_SERVER__PORT=9000`.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("app.name", "Helpdesk")?
            .set_default("app.url", "http://localhost:8000")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000_i64)?
            .set_default("database.path", "helpdesk.db")?
            .set_default("storage.uploads_dir", "uploads")?
            .set_default("mail.enabled", false)?
            .set_default("mail.smtp_host", "localhost")?
            .set_default("mail.smtp_port", 587_i64)?
            .set_default("mail.username", "")?
            .set_default("mail.password", "")?
            .set_default("mail.from_address", "support@example.com")?
            .set_default("mail.from_name", "Helpdesk")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name("helpdesk").required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix("HELPDESK").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Socket address string for the HTTP listener
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::load(None).expect("defaults should load");
        assert_eq!(config.app.name, "Helpdesk");
        assert_eq!(config.server.port, 8000);
        assert!(!config.mail.enabled);
        assert_eq!(config.database.path, PathBuf::from("helpdesk.db"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("helpdesk.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\n\n[app]\nname = \"Acme Support\""
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).expect("file config should load");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.app.name, "Acme Support");
        // untouched sections keep their defaults
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_listen_addr() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.listen_addr(), "127.0.0.1:8000");
    }
}
