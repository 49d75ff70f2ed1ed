//! Embedded page and mail templates
//!
//! All templates are compiled into the binary; nothing is read from disk at
//! run time. Pages extend `layout.html`, mail bodies stand alone.

use crate::core::{Settings, User};
use crate::error::Result;
use once_cell::sync::Lazy;
use tera::Tera;

pub use tera::Context;

static ENGINE: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("layout.html", include_str!("../../templates/layout.html.tera")),
        ("login.html", include_str!("../../templates/login.html.tera")),
        (
            "tickets/index.html",
            include_str!("../../templates/tickets/index.html.tera"),
        ),
        (
            "tickets/show.html",
            include_str!("../../templates/tickets/show.html.tera"),
        ),
        (
            "tickets/create.html",
            include_str!("../../templates/tickets/create.html.tera"),
        ),
        (
            "tickets/edit.html",
            include_str!("../../templates/tickets/edit.html.tera"),
        ),
        (
            "tickets/reply.html",
            include_str!("../../templates/tickets/reply.html.tera"),
        ),
        (
            "tickets/change_status.html",
            include_str!("../../templates/tickets/change_status.html.tera"),
        ),
        (
            "tickets/tags.html",
            include_str!("../../templates/tickets/tags.html.tera"),
        ),
        (
            "settings/theme.html",
            include_str!("../../templates/settings/theme.html.tera"),
        ),
        (
            "settings/tickets.html",
            include_str!("../../templates/settings/tickets.html.tera"),
        ),
        (
            "mail/ticket_created.html",
            include_str!("../../templates/mail/ticket_created.html.tera"),
        ),
        (
            "mail/ticket_closed.html",
            include_str!("../../templates/mail/ticket_closed.html.tera"),
        ),
        (
            "mail/ticket_reply.html",
            include_str!("../../templates/mail/ticket_reply.html.tera"),
        ),
    ])
    .unwrap_or_else(|e| panic!("embedded template registration failed: {e}"));
    tera
});

/// Render a registered template with the given context
pub fn render(name: &str, context: &Context) -> Result<String> {
    Ok(ENGINE.render(name, context)?)
}

/// Context shared by every page: app identity, theme, and the viewer
#[must_use]
pub fn base_context(app_name: &str, settings: &Settings, user: Option<&User>) -> Context {
    let mut ctx = Context::new();
    ctx.insert("app_name", app_name);
    ctx.insert("theme_name", &settings.theme_name);
    ctx.insert("theme_css", &settings.theme_css);
    ctx.insert("is_team", &user.is_some_and(User::is_team));
    if let Some(user) = user {
        ctx.insert("current_user", user);
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ReplyingInterface, UserKind};
    use chrono::Utc;

    fn settings() -> Settings {
        Settings {
            id: 1,
            theme_name: "default".to_string(),
            theme_css: ".x { color: red; }".to_string(),
            tickets_replying_interface: ReplyingInterface::Inline,
            tickets_allow_edit_subject: true,
            tickets_allow_edit_body: true,
        }
    }

    fn team_user() -> User {
        User {
            id: 1,
            first_name: "Alex".to_string(),
            last_name: "Doe".to_string(),
            email: "alex@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            kind: UserKind::Team,
            client_id: None,
            theme: "default".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_login_page_renders_within_layout() {
        let ctx = base_context("Helpdesk", &settings(), None);
        let html = render("login.html", &ctx).unwrap();

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("Helpdesk"));
        assert!(html.contains("name=\"email\""));
    }

    #[test]
    fn test_layout_carries_theme_css_and_user() {
        let user = team_user();
        let ctx = base_context("Helpdesk", &settings(), Some(&user));
        let html = render("login.html", &ctx).unwrap();

        assert!(html.contains(".x { color: red; }"));
        assert!(html.contains("Alex"));
        // The password hash is never serialized into a page context.
        assert!(!html.contains("secret-hash"));
    }

    #[test]
    fn test_mail_body_renders_standalone() {
        let mut ctx = Context::new();
        ctx.insert("app_name", "Helpdesk");
        ctx.insert("recipient_name", "Jordan");
        ctx.insert("ticket_id", &42);
        ctx.insert("ticket_subject", "VPN down");
        ctx.insert("ticket_url", "http://localhost/tickets/42");
        let html = render("mail/ticket_created.html", &ctx).unwrap();

        assert!(html.contains("Jordan"));
        assert!(html.contains("VPN down"));
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        assert!(render("missing.html", &Context::new()).is_err());
    }
}
