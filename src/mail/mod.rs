//! Outbound mail
//!
//! Handlers never talk to SMTP. They render a message and enqueue it; a
//! background flusher drains pending rows through lettre when a transport
//! is configured. Without one (the default in development and tests) rows
//! simply stay pending.

mod messages;

pub use messages::{ticket_closed, ticket_created, ticket_reply, RenderedMail};

use crate::config::MailSection;
use crate::core::{QueuedMail, QueuedMailStatus};
use crate::error::Result;
use crate::storage::EmailQueueRepository;
use chrono::Utc;
use lettre::message::{Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{debug, warn};

/// Queues rendered messages and delivers them when SMTP is configured
#[derive(Clone)]
pub struct Mailer {
    queue: EmailQueueRepository,
    config: MailSection,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl Mailer {
    /// Build the mailer; a relay transport is only constructed when mail
    /// is enabled in the configuration
    pub fn new(queue: EmailQueueRepository, config: MailSection) -> Result<Self> {
        let transport = if config.enabled {
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?;
            if !config.username.is_empty() {
                builder = builder.credentials(Credentials::new(
                    config.username.clone(),
                    config.password.clone(),
                ));
            }
            Some(builder.port(config.smtp_port).build())
        } else {
            None
        };

        Ok(Self {
            queue,
            config,
            transport,
        })
    }

    /// Queue a rendered message for one recipient
    pub async fn enqueue(
        &self,
        recipient: &str,
        mail: &RenderedMail,
        resource_type: &str,
        resource_id: i64,
    ) -> Result<i64> {
        self.queue
            .enqueue(&QueuedMail {
                id: 0,
                recipient: recipient.to_string(),
                subject: mail.subject.clone(),
                body: mail.body.clone(),
                resource_type: resource_type.to_string(),
                resource_id,
                status: QueuedMailStatus::Pending,
                created_at: Utc::now(),
            })
            .await
    }

    /// Drop queued-but-unsent mail for a resource (e.g. a deleted reply)
    pub async fn purge_pending(&self, resource_type: &str, resource_id: i64) -> Result<u64> {
        self.queue
            .delete_pending_for_resource(resource_type, resource_id)
            .await
    }

    /// Deliver up to `limit` pending rows, marking each sent or failed
    ///
    /// A no-op without a transport. Returns how many rows were attempted.
    pub async fn flush_batch(&self, limit: i64) -> Result<usize> {
        let Some(transport) = &self.transport else {
            return Ok(0);
        };

        let rows = self.queue.pending(limit).await?;
        let attempted = rows.len();
        let from = Mailbox::new(
            Some(self.config.from_name.clone()),
            self.config.from_address.parse::<Address>()?,
        );

        for row in rows {
            let status = match self.deliver(transport, &from, &row).await {
                Ok(()) => QueuedMailStatus::Sent,
                Err(e) => {
                    warn!(mail_id = row.id, recipient = %row.recipient, error = %e, "mail delivery failed");
                    QueuedMailStatus::Failed
                }
            };
            self.queue.mark(row.id, status).await?;
        }

        debug!(attempted, "mail queue flushed");
        Ok(attempted)
    }

    async fn deliver(
        &self,
        transport: &AsyncSmtpTransport<Tokio1Executor>,
        from: &Mailbox,
        row: &QueuedMail,
    ) -> Result<()> {
        let message = Message::builder()
            .from(from.clone())
            .to(row.recipient.parse::<Mailbox>()?)
            .subject(&row.subject)
            .singlepart(SinglePart::html(row.body.clone()))?;
        transport.send(message).await?;
        Ok(())
    }

    /// Spawn the periodic queue flusher
    pub fn spawn_flusher(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(30));
            loop {
                interval.tick().await;
                if let Err(e) = self.flush_batch(20).await {
                    warn!(error = %e, "mail queue flush failed");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use tempfile::TempDir;

    fn disabled_config() -> MailSection {
        MailSection {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 25,
            username: String::new(),
            password: String::new(),
            from_address: "helpdesk@example.com".to_string(),
            from_name: "Helpdesk".to_string(),
        }
    }

    #[tokio::test]
    async fn test_disabled_mailer_queues_but_never_sends() {
        let dir = TempDir::new().unwrap();
        let db = Database::connect(&dir.path().join("test.db")).await.unwrap();
        db.migrate().await.unwrap();
        let queue = EmailQueueRepository::new(db.pool().clone());
        let mailer = Mailer::new(queue.clone(), disabled_config()).unwrap();

        mailer
            .enqueue(
                "client@example.com",
                &RenderedMail {
                    subject: "s".to_string(),
                    body: "b".to_string(),
                },
                "ticket",
                1,
            )
            .await
            .unwrap();

        assert_eq!(mailer.flush_batch(10).await.unwrap(), 0);
        assert_eq!(queue.pending(10).await.unwrap().len(), 1);
    }
}
