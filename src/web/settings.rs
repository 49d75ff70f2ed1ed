//! Settings endpoints
//!
//! Theme and ticket-module options, team only. Custom CSS is stored as-is
//! apart from `<style>` tags, which are stripped so the stored value can be
//! inlined into the layout's style block.

use crate::core::{ReplyingInterface, Settings};
use crate::templates;
use crate::validation::{strip_style_tags, Validator};
use crate::web::auth::{require_team, CurrentUser};
use crate::web::error::WebResult;
use crate::web::state::SharedState;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/settings/theme", get(theme_form).put(update_theme))
        .route("/settings/tickets", get(tickets_form).put(update_tickets))
}

async fn theme_form(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> WebResult<Html<String>> {
    require_team(&user)?;
    let settings = state.settings.load().await?;

    let mut ctx = templates::base_context(&state.config.app.name, &settings, Some(&user));
    ctx.insert("settings", &settings);
    Ok(Html(templates::render("settings/theme.html", &ctx)?))
}

#[derive(Debug, Deserialize)]
struct ThemePayload {
    #[serde(default)]
    theme_name: String,
    #[serde(default)]
    custom_css: String,
    #[serde(default)]
    reset_users_theme: bool,
}

async fn update_theme(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ThemePayload>,
) -> WebResult<Json<Settings>> {
    require_team(&user)?;

    let mut v = Validator::new();
    v.require("Theme name", &payload.theme_name);
    v.no_tags("Theme name", &payload.theme_name);
    v.into_result()?;

    let css = strip_style_tags(&payload.custom_css);
    let name = payload.theme_name.trim();
    state.settings.update_theme(name, &css).await?;

    if payload.reset_users_theme {
        let reset = state.users.reset_all_themes(name).await?;
        info!(count = reset, theme = %name, "user themes reset");
    }

    let settings = state.settings.load().await?;
    Ok(Json(settings))
}

async fn tickets_form(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> WebResult<Html<String>> {
    require_team(&user)?;
    let settings = state.settings.load().await?;

    let mut ctx = templates::base_context(&state.config.app.name, &settings, Some(&user));
    ctx.insert("settings", &settings);
    Ok(Html(templates::render("settings/tickets.html", &ctx)?))
}

#[derive(Debug, Deserialize)]
struct TicketOptionsPayload {
    #[serde(default)]
    replying_interface: String,
    #[serde(default)]
    allow_edit_subject: bool,
    #[serde(default)]
    allow_edit_body: bool,
}

async fn update_tickets(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<TicketOptionsPayload>,
) -> WebResult<Json<Settings>> {
    require_team(&user)?;

    let interface = match payload.replying_interface.as_str() {
        "popup" => Some(ReplyingInterface::Popup),
        "inline" => Some(ReplyingInterface::Inline),
        _ => None,
    };
    let mut v = Validator::new();
    if interface.is_none() {
        v.push("Replying interface is required");
    }
    v.into_result()?;

    state
        .settings
        .update_ticket_options(
            interface.unwrap_or_default(),
            payload.allow_edit_subject,
            payload.allow_edit_body,
        )
        .await?;

    let settings = state.settings.load().await?;
    Ok(Json(settings))
}
