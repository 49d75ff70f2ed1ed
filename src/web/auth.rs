//! Session authentication
//!
//! Logins create a row in the sessions table and hand the browser an
//! HTTP-only cookie. The [`CurrentUser`] extractor resolves that cookie on
//! every protected route; pages bounce to `/login`, actions get a 401.

use crate::core::User;
use crate::error::HelpdeskError;
use crate::templates;
use crate::web::error::{WebError, WebResult};
use crate::web::state::SharedState;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "helpdesk_session";

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/logout", post(logout))
}

/// The authenticated user, resolved from the session cookie
pub struct CurrentUser(pub User);

#[axum::async_trait]
impl FromRequestParts<SharedState> for CurrentUser {
    type Rejection = WebError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let denied = || auth_failure(&parts.method);
        let token = cookie_value(&parts.headers, SESSION_COOKIE).ok_or_else(denied)?;
        let user = state
            .sessions
            .user_for_token(&token)
            .await?
            .ok_or_else(denied)?;
        Ok(Self(user))
    }
}

fn auth_failure(method: &Method) -> WebError {
    if method == Method::GET {
        WebError::AuthRedirect
    } else {
        WebError::from(HelpdeskError::Unauthorized)
    }
}

/// Gate a handler to team members
pub fn require_team(user: &User) -> WebResult<()> {
    if user.is_team() {
        Ok(())
    } else {
        Err(WebError::Forbidden)
    }
}

/// Pull one cookie's value out of the Cookie header
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}

async fn login_form(State(state): State<SharedState>) -> WebResult<Html<String>> {
    let settings = state.settings.load().await?;
    let ctx = templates::base_context(&state.config.app.name, &settings, None);
    Ok(Html(templates::render("login.html", &ctx)?))
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    email: String,
    password: String,
}

async fn login(
    State(state): State<SharedState>,
    Form(form): Form<LoginForm>,
) -> WebResult<Response> {
    let user = state
        .users
        .by_email(form.email.trim())
        .await?
        .ok_or(HelpdeskError::InvalidCredentials)?;

    if !bcrypt::verify(&form.password, &user.password_hash)? {
        return Err(HelpdeskError::InvalidCredentials.into());
    }

    let token = state.sessions.create(user.id).await?;
    let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::to("/tickets"),
    )
        .into_response())
}

async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> WebResult<Response> {
    if let Some(token) = cookie_value(&headers, SESSION_COOKIE) {
        state.sessions.delete(&token).await?;
    }
    let expired = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    Ok((
        StatusCode::SEE_OTHER,
        [
            (header::SET_COOKIE, expired),
            (header::LOCATION, "/login".to_string()),
        ],
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_value_parses_multi_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; helpdesk_session=abc123; other=1"),
        );

        assert_eq!(
            cookie_value(&headers, SESSION_COOKIE),
            Some("abc123".to_string())
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_auth_failure_depends_on_method() {
        assert!(matches!(auth_failure(&Method::GET), WebError::AuthRedirect));
        assert!(matches!(
            auth_failure(&Method::POST),
            WebError::Domain(HelpdeskError::Unauthorized)
        ));
    }
}
