//! Ticket endpoints
//!
//! GET endpoints render pages; mutating endpoints take and return JSON, as
//! the original ajax front end expects. Every handler validates, writes
//! through the repositories, then fans out events and mail where the
//! operation calls for it.

use crate::core::{
    ActiveState, Attachment, AttachmentParent, EventAction, EventBuilder, Priority, ReplyBuilder,
    ReplyKind, Ticket, TicketBuilder, TicketSource, User, ANSWERED_STATUS_ID, CLOSED_STATUS_ID,
    MAIL_RESOURCE_REPLY, MAIL_RESOURCE_TICKET, OPEN_STATUS_ID, TICKET_CATEGORY_KIND,
    TICKET_TAG_KIND,
};
use crate::error::HelpdeskError;
use crate::files::FileStore;
use crate::mail;
use crate::storage::{TicketFilter, TicketUpdate};
use crate::templates;
use crate::validation::Validator;
use crate::web::auth::{require_team, CurrentUser};
use crate::web::error::WebResult;
use crate::web::state::{AppState, SharedState};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/tickets", get(index).post(store).delete(destroy))
        .route("/tickets/create", get(create_form))
        .route(
            "/tickets/change-status",
            get(change_status_form).post(change_status),
        )
        .route("/tickets/archive", post(archive))
        .route("/tickets/restore", post(restore))
        .route("/tickets/replies/:id/edit", get(edit_reply_form))
        .route("/tickets/replies/:id", put(update_reply).delete(delete_reply))
        .route("/tickets/:id", get(show).put(update))
        .route("/tickets/:id/edit", get(edit_form))
        .route("/tickets/:id/reply", get(reply_form).post(store_reply))
        .route("/tickets/:id/pinning", post(toggle_pinning))
        .route("/tickets/:id/tags", get(edit_tags_form).put(update_tags))
}

const PRIORITIES: [&str; 4] = ["low", "normal", "high", "urgent"];

/// Load a ticket, hiding other clients' tickets from client users
async fn load_scoped(state: &AppState, user: &User, id: i64) -> WebResult<Ticket> {
    let ticket = state.tickets.by_id(id).await?;
    if user.is_client() && Some(ticket.client_id) != user.client_id {
        return Err(HelpdeskError::TicketNotFound { id }.into());
    }
    Ok(ticket)
}

/// The users on the other side of the conversation, minus the actor
async fn audience_for(state: &AppState, actor: &User, ticket: &Ticket) -> WebResult<Vec<User>> {
    let users = if actor.is_client() {
        state.users.team_members().await?
    } else {
        state.users.client_users(ticket.client_id).await?
    };
    Ok(users.into_iter().filter(|u| u.id != actor.id).collect())
}

/// The original sender address of an email-sourced ticket, when its
/// category has imap replies enabled
async fn imap_sender(state: &AppState, ticket: &Ticket) -> WebResult<Option<String>> {
    if ticket.source != TicketSource::Email {
        return Ok(None);
    }
    let Some(address) = ticket.imap_sender_address.clone() else {
        return Ok(None);
    };
    let Some(category) = state.categories.by_id(ticket.category_id).await? else {
        return Ok(None);
    };
    Ok(category.imap_replies.then_some(address))
}

async fn notify_opened(state: &AppState, actor: &User, ticket: &Ticket) -> WebResult<()> {
    let audience = audience_for(state, actor, ticket).await?;
    let event = EventBuilder::new(actor.id, EventAction::OpenedTicket)
        .ticket(ticket)
        .content(&ticket.subject)
        .build();
    let tracked: Vec<i64> = audience.iter().map(|u| u.id).collect();
    state.events.record(&event, &tracked).await?;

    for user in &audience {
        let message = mail::ticket_created(
            &state.config.app.name,
            &state.config.app.url,
            &user.full_name(),
            ticket,
        )?;
        state
            .mailer
            .enqueue(&user.email, &message, MAIL_RESOURCE_TICKET, ticket.id)
            .await?;
    }
    Ok(())
}

/// Closure fan-out: one event, mail to the ticket's client users, plus the
/// original sender for email-sourced tickets
async fn notify_closed(state: &AppState, actor: &User, ticket: &Ticket) -> WebResult<()> {
    let audience: Vec<User> = state
        .users
        .client_users(ticket.client_id)
        .await?
        .into_iter()
        .filter(|u| u.id != actor.id)
        .collect();

    let event = EventBuilder::new(actor.id, EventAction::ClosedTicket)
        .ticket(ticket)
        .content(&ticket.subject)
        .build();
    let tracked: Vec<i64> = audience.iter().map(|u| u.id).collect();
    state.events.record(&event, &tracked).await?;

    for user in &audience {
        let message = mail::ticket_closed(
            &state.config.app.name,
            &state.config.app.url,
            &user.full_name(),
            ticket,
        )?;
        state
            .mailer
            .enqueue(&user.email, &message, MAIL_RESOURCE_TICKET, ticket.id)
            .await?;
    }

    if let Some(address) = imap_sender(state, ticket).await? {
        let message = mail::ticket_closed(
            &state.config.app.name,
            &state.config.app.url,
            &address,
            ticket,
        )?;
        state
            .mailer
            .enqueue(&address, &message, MAIL_RESOURCE_TICKET, ticket.id)
            .await?;
    }
    Ok(())
}

async fn notify_replied(
    state: &AppState,
    actor: &User,
    ticket: &Ticket,
    reply_id: i64,
    text: &str,
) -> WebResult<()> {
    let audience = audience_for(state, actor, ticket).await?;
    let event = EventBuilder::new(actor.id, EventAction::RepliedTicket)
        .ticket(ticket)
        .content(text)
        .build();
    let tracked: Vec<i64> = audience.iter().map(|u| u.id).collect();
    state.events.record(&event, &tracked).await?;

    for user in &audience {
        let message = mail::ticket_reply(
            &state.config.app.name,
            &state.config.app.url,
            &user.full_name(),
            ticket,
            text,
        )?;
        state
            .mailer
            .enqueue(&user.email, &message, MAIL_RESOURCE_REPLY, reply_id)
            .await?;
    }

    if let Some(address) = imap_sender(state, ticket).await? {
        let message = mail::ticket_reply(
            &state.config.app.name,
            &state.config.app.url,
            &address,
            ticket,
            text,
        )?;
        state
            .mailer
            .enqueue(&address, &message, MAIL_RESOURCE_REPLY, reply_id)
            .await?;
    }
    Ok(())
}

/// Turn uploaded files into attachment rows on a stored resource
///
/// The map's keys are upload ids, the values the filenames the client sent.
/// Uploads with no file on disk are silently skipped.
async fn claim_attachments(
    state: &AppState,
    uploads: &HashMap<String, String>,
    parent: AttachmentParent,
    resource_id: i64,
    client_id: i64,
) -> WebResult<()> {
    for (upload_id, filename) in uploads {
        let directory = FileStore::sanitize(upload_id);
        let filename = FileStore::sanitize(filename);
        if !state.files.exists(&directory, &filename) {
            continue;
        }
        state
            .attachments
            .create(&Attachment {
                id: 0,
                uniqueid: Uuid::new_v4().simple().to_string(),
                client_id,
                resource_type: parent,
                resource_id,
                directory,
                filename,
                created_at: Utc::now(),
            })
            .await?;
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct IndexQuery {
    search: Option<String>,
    status_id: Option<i64>,
    category_id: Option<i64>,
    priority: Option<String>,
    state: Option<String>,
}

async fn index(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<IndexQuery>,
) -> WebResult<Html<String>> {
    let archived_view = query.state.as_deref() == Some("archived");
    let filter = TicketFilter {
        viewer_id: user.id,
        client_id: user.is_client().then(|| user.client_id.unwrap_or(0)),
        status_id: query.status_id.filter(|id| *id > 0),
        category_id: query.category_id.filter(|id| *id > 0),
        priority: query.priority.as_deref().map(Priority::parse),
        active_state: if archived_view {
            ActiveState::Archived
        } else {
            ActiveState::Active
        },
        search: query.search.clone(),
    };

    let tickets = state.tickets.list(&filter).await?;
    let stats = state.tickets.status_counts().await?;
    let statuses = state.tickets.statuses().await?;
    let categories = state.categories.of_kind(TICKET_CATEGORY_KIND).await?;
    let settings = state.settings.load().await?;

    let mut ctx = templates::base_context(&state.config.app.name, &settings, Some(&user));
    ctx.insert("tickets", &tickets);
    ctx.insert("stats", &stats);
    ctx.insert("statuses", &statuses);
    ctx.insert("categories", &categories);
    ctx.insert("search", &query.search.unwrap_or_default());
    ctx.insert("filter_status_id", &filter.status_id.unwrap_or(0));
    ctx.insert("filter_category_id", &filter.category_id.unwrap_or(0));
    ctx.insert("archived_view", &archived_view);
    Ok(Html(templates::render("tickets/index.html", &ctx)?))
}

async fn create_form(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> WebResult<Html<String>> {
    let categories = state.categories.of_kind(TICKET_CATEGORY_KIND).await?;
    let custom_fields = state.custom_fields.enabled().await?;
    let client_users = if user.is_team() {
        state.users.all_client_users().await?
    } else {
        Vec::new()
    };
    let settings = state.settings.load().await?;

    let mut ctx = templates::base_context(&state.config.app.name, &settings, Some(&user));
    ctx.insert("categories", &categories);
    ctx.insert("custom_fields", &custom_fields);
    ctx.insert("client_users", &client_users);
    ctx.insert("priorities", &PRIORITIES);
    Ok(Html(templates::render("tickets/create.html", &ctx)?))
}

#[derive(Debug, Deserialize)]
struct StorePayload {
    #[serde(default)]
    subject: String,
    #[serde(default)]
    body: String,
    category_id: Option<i64>,
    priority: Option<String>,
    /// Team members create tickets on behalf of a client user
    client_user_id: Option<i64>,
    #[serde(default)]
    attachments: HashMap<String, String>,
    #[serde(default)]
    custom_fields: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
struct CreatedResponse {
    id: i64,
}

async fn store(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<StorePayload>,
) -> WebResult<(StatusCode, Json<CreatedResponse>)> {
    let client_id = if user.is_client() {
        user.client_id.unwrap_or(0)
    } else {
        match payload.client_user_id {
            Some(id) if id > 0 => state
                .users
                .by_id(id)
                .await?
                .and_then(|u| u.client_id)
                .unwrap_or(0),
            _ => 0,
        }
    };

    let mut v = Validator::new();
    v.require("Subject", &payload.subject);
    v.require("Body", &payload.body);
    v.require_id("Category", payload.category_id);
    if client_id <= 0 {
        v.push("Client is required");
    }
    let fields = state.custom_fields.enabled().await?;
    for field in &fields {
        if field.is_mandatory() {
            let value = payload
                .custom_fields
                .get(&field.name)
                .map(String::as_str)
                .unwrap_or("");
            v.require(&field.title, value);
        }
    }
    v.into_result()?;

    let category_id = payload.category_id.unwrap_or(0);
    let ticket = TicketBuilder::new()
        .subject(payload.subject.trim())
        .body(&payload.body)
        .client_id(client_id)
        .creator_id(user.id)
        .category_id(category_id)
        .priority(Priority::parse(payload.priority.as_deref().unwrap_or("")))
        .build();

    let id = state.tickets.create(&ticket).await?;
    let mut stored = ticket;
    stored.id = id;

    claim_attachments(
        &state,
        &payload.attachments,
        AttachmentParent::Ticket,
        id,
        client_id,
    )
    .await?;

    let known: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    let values: HashMap<String, String> = payload
        .custom_fields
        .iter()
        .filter(|(name, _)| known.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    if !values.is_empty() {
        state.custom_fields.save_values(id, &values).await?;
    }

    notify_opened(&state, &user, &stored).await?;
    info!(ticket_id = id, creator = user.id, "ticket created");

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

async fn show(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> WebResult<Html<String>> {
    let ticket = load_scoped(&state, &user, id).await?;

    let replies = state.replies.for_ticket(id, user.is_team()).await?;
    let tags = state.tags.for_resource(TICKET_TAG_KIND, id).await?;
    let attachments = state
        .attachments
        .for_resource(AttachmentParent::Ticket, id)
        .await?;
    let custom_fields = state.custom_fields.values_for_ticket(id).await?;
    let statuses = state.tickets.statuses().await?;
    let status = statuses.iter().find(|s| s.id == ticket.status_id);
    let category = state.categories.by_id(ticket.category_id).await?;
    let settings = state.settings.load().await?;

    // Opening the ticket clears its unread markers for this user.
    state.events.mark_read("ticket", id, user.id).await?;

    let mut ctx = templates::base_context(&state.config.app.name, &settings, Some(&user));
    ctx.insert("ticket", &ticket);
    ctx.insert("replies", &replies);
    ctx.insert("tags", &tags);
    ctx.insert("attachments", &attachments);
    ctx.insert("custom_fields", &custom_fields);
    ctx.insert("status_title", status.map_or("", |s| s.title.as_str()));
    ctx.insert("status_color", status.map_or("", |s| s.color.as_str()));
    ctx.insert(
        "category_name",
        category.as_ref().map_or("", |c| c.name.as_str()),
    );
    ctx.insert("replying_interface", &settings.tickets_replying_interface);
    Ok(Html(templates::render("tickets/show.html", &ctx)?))
}

async fn edit_form(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> WebResult<Html<String>> {
    require_team(&user)?;
    let ticket = state.tickets.by_id(id).await?;
    let categories = state.categories.of_kind(TICKET_CATEGORY_KIND).await?;
    let statuses = state.tickets.statuses().await?;
    let attachments = state
        .attachments
        .for_resource(AttachmentParent::Ticket, id)
        .await?;
    let settings = state.settings.load().await?;

    let mut ctx = templates::base_context(&state.config.app.name, &settings, Some(&user));
    ctx.insert("ticket", &ticket);
    ctx.insert("categories", &categories);
    ctx.insert("statuses", &statuses);
    ctx.insert("attachments", &attachments);
    ctx.insert("priorities", &PRIORITIES);
    ctx.insert("allow_edit_subject", &settings.tickets_allow_edit_subject);
    ctx.insert("allow_edit_body", &settings.tickets_allow_edit_body);
    Ok(Html(templates::render("tickets/edit.html", &ctx)?))
}

#[derive(Debug, Deserialize)]
struct UpdatePayload {
    #[serde(default)]
    subject: String,
    #[serde(default)]
    body: String,
    category_id: Option<i64>,
    priority: Option<String>,
    status_id: Option<i64>,
}

#[derive(Debug, Serialize)]
struct SavedResponse {
    id: i64,
}

async fn update(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePayload>,
) -> WebResult<Json<SavedResponse>> {
    require_team(&user)?;
    let old = state.tickets.by_id(id).await?;
    let settings = state.settings.load().await?;

    // Locked fields keep their stored value regardless of the payload.
    let subject = if settings.tickets_allow_edit_subject {
        payload.subject.trim().to_string()
    } else {
        old.subject.clone()
    };
    let body = if settings.tickets_allow_edit_body {
        payload.body.clone()
    } else {
        old.body.clone()
    };

    let statuses = state.tickets.statuses().await?;
    let status_id = payload.status_id.unwrap_or(old.status_id);

    let mut v = Validator::new();
    v.require("Subject", &subject);
    v.require("Body", &body);
    v.require_id("Category", payload.category_id);
    if !statuses.iter().any(|s| s.id == status_id) {
        v.push("Status is required");
    }
    v.into_result()?;

    let update = TicketUpdate {
        subject,
        body,
        category_id: payload.category_id.unwrap_or(0),
        priority: payload
            .priority
            .as_deref()
            .map_or(old.priority, Priority::parse),
        status_id,
    };
    state.tickets.update(id, &update).await?;

    // Transitioning into Closed records the closure exactly once.
    if old.status_id != CLOSED_STATUS_ID && status_id == CLOSED_STATUS_ID {
        let mut closed = old.clone();
        closed.subject = update.subject.clone();
        closed.status_id = status_id;
        notify_closed(&state, &user, &closed).await?;
        info!(ticket_id = id, "ticket closed");
    }

    Ok(Json(SavedResponse { id }))
}

async fn reply_form(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> WebResult<Html<String>> {
    let ticket = load_scoped(&state, &user, id).await?;
    let settings = state.settings.load().await?;

    let mut ctx = templates::base_context(&state.config.app.name, &settings, Some(&user));
    ctx.insert("ticket", &ticket);
    ctx.insert("replying_interface", &settings.tickets_replying_interface);
    Ok(Html(templates::render("tickets/reply.html", &ctx)?))
}

#[derive(Debug, Deserialize)]
struct ReplyPayload {
    #[serde(default)]
    text: String,
    /// `reply` (default) or `note`; only team members may write notes
    kind: Option<String>,
    #[serde(default)]
    attachments: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
struct ReplyResponse {
    id: i64,
    status_id: i64,
}

async fn store_reply(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ReplyPayload>,
) -> WebResult<(StatusCode, Json<ReplyResponse>)> {
    let ticket = load_scoped(&state, &user, id).await?;

    let mut v = Validator::new();
    v.require("Reply", &payload.text);
    v.into_result()?;

    let kind = if user.is_team() && payload.kind.as_deref() == Some("note") {
        ReplyKind::Note
    } else {
        ReplyKind::Reply
    };

    let reply = ReplyBuilder::new()
        .ticket_id(id)
        .client_id(ticket.client_id)
        .user_id(user.id)
        .text(payload.text.trim())
        .kind(kind)
        .build();
    let reply_id = state.replies.create(&reply).await?;

    claim_attachments(
        &state,
        &payload.attachments,
        AttachmentParent::Reply,
        reply_id,
        ticket.client_id,
    )
    .await?;

    // Notes are internal bookkeeping: no status change, no event, no mail.
    if kind == ReplyKind::Note {
        return Ok((
            StatusCode::CREATED,
            Json(ReplyResponse {
                id: reply_id,
                status_id: ticket.status_id,
            }),
        ));
    }

    let status_id = if user.is_team() {
        ANSWERED_STATUS_ID
    } else {
        OPEN_STATUS_ID
    };
    state.tickets.set_status(id, status_id).await?;
    state.tickets.touch(id).await?;

    notify_replied(&state, &user, &ticket, reply_id, payload.text.trim()).await?;
    info!(ticket_id = id, reply_id, "reply stored");

    Ok((
        StatusCode::CREATED,
        Json(ReplyResponse {
            id: reply_id,
            status_id,
        }),
    ))
}

/// Whether this user may touch this reply (team, or the author)
fn can_edit_reply(user: &User, author_id: i64) -> bool {
    user.is_team() || user.id == author_id
}

#[derive(Debug, Serialize)]
struct ReplyText {
    id: i64,
    text: String,
}

async fn edit_reply_form(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> WebResult<Json<ReplyText>> {
    let reply = state.replies.by_id(id).await?;
    if !can_edit_reply(&user, reply.user_id) {
        return Err(HelpdeskError::ReplyNotFound { id }.into());
    }
    Ok(Json(ReplyText {
        id: reply.id,
        text: reply.text,
    }))
}

#[derive(Debug, Deserialize)]
struct ReplyUpdatePayload {
    #[serde(default)]
    text: String,
}

async fn update_reply(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ReplyUpdatePayload>,
) -> WebResult<Json<ReplyText>> {
    let reply = state.replies.by_id(id).await?;
    if !can_edit_reply(&user, reply.user_id) {
        return Err(HelpdeskError::ReplyNotFound { id }.into());
    }

    let mut v = Validator::new();
    v.require("Reply", &payload.text);
    v.into_result()?;

    state.replies.update_text(id, payload.text.trim()).await?;
    Ok(Json(ReplyText {
        id,
        text: payload.text.trim().to_string(),
    }))
}

#[derive(Debug, Serialize)]
struct DeletedResponse {
    deleted: u64,
}

async fn delete_reply(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> WebResult<Json<DeletedResponse>> {
    let reply = state.replies.by_id(id).await?;
    if !can_edit_reply(&user, reply.user_id) {
        return Err(HelpdeskError::ReplyNotFound { id }.into());
    }

    // Mail queued for this reply but not yet sent must never go out.
    state
        .mailer
        .purge_pending(MAIL_RESOURCE_REPLY, id)
        .await?;

    let removed = state
        .attachments
        .delete_for_resources(AttachmentParent::Reply, &[id])
        .await?;
    for attachment in &removed {
        state.files.delete_directory(&attachment.directory)?;
    }

    state.replies.delete(id).await?;
    info!(reply_id = id, "reply deleted");
    Ok(Json(DeletedResponse { deleted: 1 }))
}

#[derive(Debug, Deserialize)]
struct ChangeStatusQuery {
    ids: Option<String>,
}

async fn change_status_form(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ChangeStatusQuery>,
) -> WebResult<Html<String>> {
    require_team(&user)?;
    let statuses = state.tickets.statuses().await?;
    let settings = state.settings.load().await?;

    let mut ctx = templates::base_context(&state.config.app.name, &settings, Some(&user));
    ctx.insert("statuses", &statuses);
    ctx.insert("ids", &query.ids.unwrap_or_default());
    Ok(Html(templates::render("tickets/change_status.html", &ctx)?))
}

#[derive(Debug, Deserialize)]
struct ChangeStatusPayload {
    #[serde(default)]
    ids: Vec<i64>,
    status_id: Option<i64>,
}

#[derive(Debug, Serialize)]
struct UpdatedResponse {
    updated: u64,
}

async fn change_status(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ChangeStatusPayload>,
) -> WebResult<Json<UpdatedResponse>> {
    require_team(&user)?;

    let statuses = state.tickets.statuses().await?;
    let mut v = Validator::new();
    if payload.ids.is_empty() {
        v.push("No tickets selected");
    }
    let status_id = payload.status_id.unwrap_or(0);
    if !statuses.iter().any(|s| s.id == status_id) {
        v.push("Status is required");
    }
    v.into_result()?;

    let mut existing = Vec::new();
    let mut closing = Vec::new();
    for id in &payload.ids {
        let Some(ticket) = state.tickets.try_by_id(*id).await? else {
            continue;
        };
        existing.push(*id);
        if ticket.status_id != CLOSED_STATUS_ID && status_id == CLOSED_STATUS_ID {
            closing.push(ticket);
        }
    }

    let updated = state.tickets.set_status_bulk(&existing, status_id).await?;
    for ticket in closing {
        let mut closed = ticket;
        closed.status_id = status_id;
        notify_closed(&state, &user, &closed).await?;
    }

    info!(count = updated, status_id, "ticket status changed");
    Ok(Json(UpdatedResponse { updated }))
}

#[derive(Debug, Deserialize)]
struct IdsPayload {
    #[serde(default)]
    ids: Vec<i64>,
}

async fn archive(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<IdsPayload>,
) -> WebResult<Json<UpdatedResponse>> {
    require_team(&user)?;
    let updated = state
        .tickets
        .set_active_state(&payload.ids, ActiveState::Archived)
        .await?;
    info!(count = updated, "tickets archived");
    Ok(Json(UpdatedResponse { updated }))
}

async fn restore(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<IdsPayload>,
) -> WebResult<Json<UpdatedResponse>> {
    require_team(&user)?;
    let updated = state
        .tickets
        .set_active_state(&payload.ids, ActiveState::Active)
        .await?;
    info!(count = updated, "tickets restored");
    Ok(Json(UpdatedResponse { updated }))
}

async fn destroy(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<IdsPayload>,
) -> WebResult<Json<DeletedResponse>> {
    require_team(&user)?;

    let mut deleted = 0;
    for id in &payload.ids {
        if state.tickets.try_by_id(*id).await?.is_none() {
            continue;
        }

        let reply_ids = state.replies.ids_for_ticket(*id).await?;

        let mut removed = state
            .attachments
            .delete_for_resources(AttachmentParent::Ticket, &[*id])
            .await?;
        removed.extend(
            state
                .attachments
                .delete_for_resources(AttachmentParent::Reply, &reply_ids)
                .await?,
        );
        for attachment in &removed {
            state.files.delete_directory(&attachment.directory)?;
        }

        state.events.delete_for_items("ticket", &[*id]).await?;
        state.tags.delete_for_resources(TICKET_TAG_KIND, &[*id]).await?;
        state.tickets.delete_pins(&[*id]).await?;
        // Replies and custom field values cascade with the row.
        state.tickets.delete(*id).await?;
        deleted += 1;
    }

    info!(count = deleted, "tickets destroyed");
    Ok(Json(DeletedResponse { deleted }))
}

#[derive(Debug, Serialize)]
struct PinnedResponse {
    pinned: bool,
}

async fn toggle_pinning(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> WebResult<Json<PinnedResponse>> {
    load_scoped(&state, &user, id).await?;
    let pinned = state.tickets.toggle_pin(user.id, id).await?;
    Ok(Json(PinnedResponse { pinned }))
}

async fn edit_tags_form(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> WebResult<Html<String>> {
    require_team(&user)?;
    let ticket = state.tickets.by_id(id).await?;
    let tags = state.tags.for_resource(TICKET_TAG_KIND, id).await?;
    let suggestions = state.tags.all_titles(TICKET_TAG_KIND).await?;
    let settings = state.settings.load().await?;

    let mut ctx = templates::base_context(&state.config.app.name, &settings, Some(&user));
    ctx.insert("ticket", &ticket);
    ctx.insert("tags", &tags);
    ctx.insert("suggestions", &suggestions);
    Ok(Html(templates::render("tickets/tags.html", &ctx)?))
}

#[derive(Debug, Deserialize)]
struct TagsPayload {
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TagsResponse {
    tags: Vec<String>,
}

async fn update_tags(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<TagsPayload>,
) -> WebResult<Json<TagsResponse>> {
    require_team(&user)?;
    state.tickets.by_id(id).await?;
    state
        .tags
        .replace(TICKET_TAG_KIND, id, &payload.tags)
        .await?;
    let tags = state
        .tags
        .for_resource(TICKET_TAG_KIND, id)
        .await?
        .into_iter()
        .map(|t| t.title)
        .collect();
    Ok(Json(TagsResponse { tags }))
}
