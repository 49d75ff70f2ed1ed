//! HTTP error mapping
//!
//! Domain errors map onto the module's HTTP conventions: validation and
//! user-level failures become 409 responses whose `text/html` body is an
//! inline `<li>` error list, missing files become 404, and authentication
//! failures become a login redirect for pages or a bare 401 for actions.

use crate::error::HelpdeskError;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use tracing::error;

/// Result alias for handlers
pub type WebResult<T> = std::result::Result<T, WebError>;

/// Error leaving the web layer
#[derive(Debug)]
pub enum WebError {
    /// A domain failure, mapped by kind
    Domain(HelpdeskError),
    /// Unauthenticated page request; send the browser to the login form
    AuthRedirect,
    /// Authenticated but not allowed to perform the action
    Forbidden,
}

impl WebError {
    /// Wrap a message as a one-item validation list
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Domain(HelpdeskError::Validation(format!(
            "<li>{}</li>",
            message.into()
        )))
    }
}

impl<E> From<E> for WebError
where
    E: Into<HelpdeskError>,
{
    fn from(err: E) -> Self {
        Self::Domain(err.into())
    }
}

fn conflict(body: String) -> Response {
    (
        StatusCode::CONFLICT,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        body,
    )
        .into_response()
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::AuthRedirect => Redirect::to("/login").into_response(),
            Self::Forbidden => {
                (StatusCode::FORBIDDEN, "You are not allowed to do that").into_response()
            }
            Self::Domain(err) => match &err {
                HelpdeskError::Validation(list) => conflict(list.clone()),
                HelpdeskError::FileNotFound { .. } => {
                    (StatusCode::NOT_FOUND, "File not found").into_response()
                }
                HelpdeskError::TicketNotFound { .. }
                | HelpdeskError::ReplyNotFound { .. }
                | HelpdeskError::InvalidCredentials
                | HelpdeskError::RequestFailed
                | HelpdeskError::Custom(_) => {
                    conflict(format!("<li>{}</li>", err.user_message()))
                }
                HelpdeskError::Unauthorized => {
                    (StatusCode::UNAUTHORIZED, "Authentication required").into_response()
                }
                _ => {
                    error!(error = %err, "request failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "The request could not be completed",
                    )
                        .into_response()
                }
            },
        }
    }
}
