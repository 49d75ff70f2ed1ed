//! Attachment endpoints
//!
//! Uploads land on disk first under a fresh upload id; the ticket or reply
//! that claims them later turns them into attachment rows. Downloads are
//! looked up by the row's public uniqueid so storage paths never leak into
//! URLs.

use crate::error::HelpdeskError;
use crate::files::FileStore;
use crate::web::auth::{require_team, CurrentUser};
use crate::web::error::{WebError, WebResult};
use crate::web::state::SharedState;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Upload cap in bytes; matches the 25 MB attachment limit a mail relay
/// will typically accept
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/tickets/attachments",
            post(upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/tickets/attachments/:uniqueid/download", get(download))
        .route("/tickets/attachments/:uniqueid", delete(remove))
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    upload_id: String,
    filename: String,
}

/// Receive one multipart file and stage it on disk
///
/// The returned upload id goes back to the server inside the ticket or
/// reply payload that claims the file.
async fn upload(
    State(state): State<SharedState>,
    CurrentUser(_user): CurrentUser,
    mut multipart: Multipart,
) -> WebResult<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| WebError::validation("Upload is not valid multipart"))?
    {
        let Some(name) = field.file_name().map(FileStore::sanitize) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|_| WebError::validation("Upload could not be read"))?;

        let upload_id = Uuid::new_v4().simple().to_string();
        state.files.save(&upload_id, &name, &bytes)?;
        info!(upload_id = %upload_id, filename = %name, size = bytes.len(), "file uploaded");

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                upload_id,
                filename: name,
            }),
        ));
    }

    Err(WebError::validation("File is required"))
}

async fn download(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(uniqueid): Path<String>,
) -> WebResult<Response> {
    let attachment = state.attachments.by_uniqueid(&uniqueid).await?;
    if user.is_client() && Some(attachment.client_id) != user.client_id {
        return Err(HelpdeskError::FileNotFound { uniqueid }.into());
    }

    let bytes = state
        .files
        .read(&attachment.directory, &attachment.filename)?;
    let disposition = format!("attachment; filename=\"{}\"", attachment.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

#[derive(Debug, Serialize)]
struct RemovedResponse {
    deleted: u64,
}

async fn remove(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Path(uniqueid): Path<String>,
) -> WebResult<Json<RemovedResponse>> {
    require_team(&user)?;
    let attachment = state.attachments.by_uniqueid(&uniqueid).await?;

    state.attachments.delete(attachment.id).await?;
    // Staged uploads hold one file per directory, so dropping the
    // directory removes the file.
    state.files.delete_directory(&attachment.directory)?;

    info!(uniqueid = %uniqueid, "attachment deleted");
    Ok(Json(RemovedResponse { deleted: 1 }))
}
