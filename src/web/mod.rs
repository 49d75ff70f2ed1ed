//! HTTP layer
//!
//! One router per resource, merged here behind request tracing. Handlers
//! stay thin: extract, validate, call the repositories, render or serialize.

pub mod attachments;
pub mod auth;
pub mod error;
pub mod settings;
pub mod state;
pub mod tickets;

pub use error::{WebError, WebResult};
pub use state::{AppState, SharedState};

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Assemble the application router
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/tickets") }))
        .merge(auth::router())
        .merge(tickets::router())
        .merge(attachments::router())
        .merge(settings::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
