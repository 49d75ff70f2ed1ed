//! Builders for records assembled in several steps
//!
//! Handlers collect fields from the request, the session, and middleware
//! before a record is complete; the builders keep that assembly readable.
//! A built record carries id 0 until the repository inserts it.

use super::{
    ActiveState, Event, EventAction, Priority, Reply, ReplyKind, Ticket, TicketSource,
    OPEN_STATUS_ID,
};
use chrono::{DateTime, Utc};

/// Builder for creating [`Ticket`] records
#[derive(Default)]
pub struct TicketBuilder {
    subject: Option<String>,
    body: Option<String>,
    client_id: Option<i64>,
    creator_id: Option<i64>,
    category_id: Option<i64>,
    status_id: Option<i64>,
    priority: Option<Priority>,
    source: Option<TicketSource>,
    imap_sender_address: Option<String>,
    active_state: Option<ActiveState>,
    created_at: Option<DateTime<Utc>>,
}

impl TicketBuilder {
    /// Create a new ticket builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the subject
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the body
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the client the ticket belongs to
    #[must_use]
    pub const fn client_id(mut self, client_id: i64) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Set the creating user
    #[must_use]
    pub const fn creator_id(mut self, creator_id: i64) -> Self {
        self.creator_id = Some(creator_id);
        self
    }

    /// Set the category
    #[must_use]
    pub const fn category_id(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Set the status id; defaults to Open
    #[must_use]
    pub const fn status_id(mut self, status_id: i64) -> Self {
        self.status_id = Some(status_id);
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the source
    #[must_use]
    pub const fn source(mut self, source: TicketSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Remember the original sender of an email-sourced ticket
    #[must_use]
    pub fn imap_sender_address(mut self, address: impl Into<String>) -> Self {
        self.imap_sender_address = Some(address.into());
        self
    }

    /// Set the active state
    #[must_use]
    pub const fn active_state(mut self, state: ActiveState) -> Self {
        self.active_state = Some(state);
        self
    }

    /// Set the creation timestamp
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the ticket
    #[must_use]
    pub fn build(self) -> Ticket {
        let created_at = self.created_at.unwrap_or_else(Utc::now);
        Ticket {
            id: 0,
            subject: self.subject.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
            client_id: self.client_id.unwrap_or_default(),
            creator_id: self.creator_id.unwrap_or_default(),
            category_id: self.category_id.unwrap_or_default(),
            status_id: self.status_id.unwrap_or(OPEN_STATUS_ID),
            priority: self.priority.unwrap_or_default(),
            source: self.source.unwrap_or_default(),
            imap_sender_address: self.imap_sender_address,
            active_state: self.active_state.unwrap_or_default(),
            created_at,
            last_updated_at: created_at,
        }
    }
}

/// Builder for creating [`Reply`] records
#[derive(Default)]
pub struct ReplyBuilder {
    ticket_id: Option<i64>,
    client_id: Option<i64>,
    user_id: Option<i64>,
    text: Option<String>,
    kind: Option<ReplyKind>,
    created_at: Option<DateTime<Utc>>,
}

impl ReplyBuilder {
    /// Create a new reply builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ticket the reply belongs to
    #[must_use]
    pub const fn ticket_id(mut self, ticket_id: i64) -> Self {
        self.ticket_id = Some(ticket_id);
        self
    }

    /// Set the client id carried over from the ticket
    #[must_use]
    pub const fn client_id(mut self, client_id: i64) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Set the authoring user
    #[must_use]
    pub const fn user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Set the reply text
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Mark the entry as a reply or an internal note
    #[must_use]
    pub const fn kind(mut self, kind: ReplyKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the creation timestamp
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the reply
    #[must_use]
    pub fn build(self) -> Reply {
        Reply {
            id: 0,
            ticket_id: self.ticket_id.unwrap_or_default(),
            client_id: self.client_id.unwrap_or_default(),
            user_id: self.user_id.unwrap_or_default(),
            text: self.text.unwrap_or_default(),
            kind: self.kind.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Builder for creating [`Event`] records
pub struct EventBuilder {
    creator_id: i64,
    action: EventAction,
    item_id: Option<i64>,
    content: Option<String>,
    parent_title: Option<String>,
    client_id: Option<i64>,
    show_in_timeline: bool,
}

impl EventBuilder {
    /// Create a builder for the given actor and action
    #[must_use]
    pub const fn new(creator_id: i64, action: EventAction) -> Self {
        Self {
            creator_id,
            action,
            item_id: None,
            content: None,
            parent_title: None,
            client_id: None,
            show_in_timeline: true,
        }
    }

    /// Convenience: fill the ticket-derived fields in one step
    #[must_use]
    pub fn ticket(mut self, ticket: &Ticket) -> Self {
        self.item_id = Some(ticket.id);
        self.parent_title = Some(ticket.subject.clone());
        self.client_id = Some(ticket.client_id);
        self
    }

    /// Set the free-text payload (subject for open/close, text for replies)
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Hide the event from the timeline
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.show_in_timeline = false;
        self
    }

    /// Build the event
    #[must_use]
    pub fn build(self) -> Event {
        Event {
            id: 0,
            creator_id: self.creator_id,
            action: self.action,
            item: "ticket".to_string(),
            item_id: self.item_id.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            parent_title: self.parent_title.unwrap_or_default(),
            client_id: self.client_id.unwrap_or_default(),
            show_in_timeline: self.show_in_timeline,
            created_at: Utc::now(),
        }
    }
}
