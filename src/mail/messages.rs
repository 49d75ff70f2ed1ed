//! Rendered notification messages
//!
//! Each function pairs a subject line with a rendered HTML body for one
//! recipient. The caller enqueues the result.

use crate::core::Ticket;
use crate::error::Result;
use crate::templates::{self, Context};

/// A subject and HTML body ready to queue
#[derive(Debug, Clone)]
pub struct RenderedMail {
    pub subject: String,
    pub body: String,
}

fn ticket_url(app_url: &str, ticket_id: i64) -> String {
    format!("{}/tickets/{ticket_id}", app_url.trim_end_matches('/'))
}

fn base_context(app_name: &str, app_url: &str, recipient_name: &str, ticket: &Ticket) -> Context {
    let mut ctx = Context::new();
    ctx.insert("app_name", app_name);
    ctx.insert("recipient_name", recipient_name);
    ctx.insert("ticket_id", &ticket.id);
    ctx.insert("ticket_subject", &ticket.subject);
    ctx.insert("ticket_url", &ticket_url(app_url, ticket.id));
    ctx
}

/// Notification for a newly opened ticket
pub fn ticket_created(
    app_name: &str,
    app_url: &str,
    recipient_name: &str,
    ticket: &Ticket,
) -> Result<RenderedMail> {
    let ctx = base_context(app_name, app_url, recipient_name, ticket);
    Ok(RenderedMail {
        subject: format!("New ticket: {} [#{}]", ticket.subject, ticket.id),
        body: templates::render("mail/ticket_created.html", &ctx)?,
    })
}

/// Notification for a ticket transitioning to Closed
pub fn ticket_closed(
    app_name: &str,
    app_url: &str,
    recipient_name: &str,
    ticket: &Ticket,
) -> Result<RenderedMail> {
    let ctx = base_context(app_name, app_url, recipient_name, ticket);
    Ok(RenderedMail {
        subject: format!("Ticket closed: {} [#{}]", ticket.subject, ticket.id),
        body: templates::render("mail/ticket_closed.html", &ctx)?,
    })
}

/// Notification for a new reply on a ticket
pub fn ticket_reply(
    app_name: &str,
    app_url: &str,
    recipient_name: &str,
    ticket: &Ticket,
    reply_text: &str,
) -> Result<RenderedMail> {
    let mut ctx = base_context(app_name, app_url, recipient_name, ticket);
    ctx.insert("reply_text", reply_text);
    Ok(RenderedMail {
        subject: format!("New reply: {} [#{}]", ticket.subject, ticket.id),
        body: templates::render("mail/ticket_reply.html", &ctx)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TicketBuilder;

    fn ticket() -> Ticket {
        let mut ticket = TicketBuilder::new().subject("VPN down").build();
        ticket.id = 42;
        ticket
    }

    #[test]
    fn test_ticket_url_normalizes_trailing_slash() {
        assert_eq!(
            ticket_url("http://localhost:8080/", 7),
            "http://localhost:8080/tickets/7"
        );
        assert_eq!(
            ticket_url("http://localhost:8080", 7),
            "http://localhost:8080/tickets/7"
        );
    }

    #[test]
    fn test_created_message_carries_link() {
        let mail = ticket_created("Helpdesk", "http://localhost", "Jordan", &ticket()).unwrap();
        assert_eq!(mail.subject, "New ticket: VPN down [#42]");
        assert!(mail.body.contains("http://localhost/tickets/42"));
        assert!(mail.body.contains("Jordan"));
    }

    #[test]
    fn test_reply_message_quotes_text() {
        let mail = ticket_reply(
            "Helpdesk",
            "http://localhost",
            "Jordan",
            &ticket(),
            "try restarting",
        )
        .unwrap();
        assert!(mail.body.contains("try restarting"));
    }
}
