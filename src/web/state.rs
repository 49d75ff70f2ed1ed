//! Shared application state
//!
//! One instance is built at startup and handed to every handler behind an
//! `Arc`. Repositories clone the pool, so the whole struct is cheap to
//! assemble.

use crate::config::AppConfig;
use crate::error::Result;
use crate::files::FileStore;
use crate::mail::Mailer;
use crate::storage::{
    AttachmentRepository, CategoryRepository, CustomFieldRepository, Database,
    EmailQueueRepository, EventRepository, ReplyRepository, SessionRepository,
    SettingsRepository, TagRepository, TicketRepository, UserRepository,
};
use std::sync::Arc;

/// Everything handlers need
pub struct AppState {
    pub config: AppConfig,
    pub tickets: TicketRepository,
    pub replies: ReplyRepository,
    pub attachments: AttachmentRepository,
    pub tags: TagRepository,
    pub categories: CategoryRepository,
    pub events: EventRepository,
    pub users: UserRepository,
    pub sessions: SessionRepository,
    pub settings: SettingsRepository,
    pub custom_fields: CustomFieldRepository,
    pub files: FileStore,
    pub mailer: Mailer,
}

/// How the router and extractors see the state
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Wire repositories, the file store and the mailer from one database
    /// and the loaded configuration
    pub fn new(db: &Database, config: AppConfig) -> Result<SharedState> {
        let pool = db.pool().clone();
        let files = FileStore::new(config.storage.uploads_dir.clone());
        files.ensure_root()?;
        let mailer = Mailer::new(
            EmailQueueRepository::new(pool.clone()),
            config.mail.clone(),
        )?;

        Ok(Arc::new(Self {
            config,
            tickets: TicketRepository::new(pool.clone()),
            replies: ReplyRepository::new(pool.clone()),
            attachments: AttachmentRepository::new(pool.clone()),
            tags: TagRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool.clone()),
            custom_fields: CustomFieldRepository::new(pool),
            files,
            mailer,
        }))
    }
}
