//! Shared harness for the HTTP integration tests
//!
//! Each test gets its own temporary database and upload directory, a router
//! wired exactly as `serve` wires it, and direct repository access for
//! asserting on stored rows.

// Not every test binary uses every helper.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::Utc;
use helpdesk::config::AppConfig;
use helpdesk::core::{User, UserKind};
use helpdesk::storage::Database;
use helpdesk::web::{self, AppState, SharedState};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEAM_PASSWORD: &str = "team-pass-1234";
pub const CLIENT_PASSWORD: &str = "client-pass-1234";

/// A fully wired application over throwaway storage
pub struct TestApp {
    dir: TempDir,
    pub db: Database,
    pub state: SharedState,
    pub router: Router,
}

pub async fn spawn() -> TestApp {
    let dir = TempDir::new().expect("temp dir");
    let mut config = AppConfig::load(None).expect("default config");
    config.database.path = dir.path().join("test.db");
    config.storage.uploads_dir = dir.path().join("uploads");

    let db = Database::connect(&config.database.path)
        .await
        .expect("connect");
    db.migrate().await.expect("migrate");

    let state = AppState::new(&db, config).expect("state");
    let router = web::router(state.clone());
    TestApp {
        dir,
        db,
        state,
        router,
    }
}

impl TestApp {
    /// Create a team member with [`TEAM_PASSWORD`], returning the user id
    pub async fn team_user(&self, email: &str) -> i64 {
        self.create_user(email, UserKind::Team, None, TEAM_PASSWORD)
            .await
    }

    /// Create a client user with [`CLIENT_PASSWORD`], returning the user id
    pub async fn client_user(&self, email: &str, client_id: i64) -> i64 {
        self.create_user(email, UserKind::Client, Some(client_id), CLIENT_PASSWORD)
            .await
    }

    async fn create_user(
        &self,
        email: &str,
        kind: UserKind,
        client_id: Option<i64>,
        password: &str,
    ) -> i64 {
        // Minimum bcrypt cost keeps the suite fast.
        let user = User {
            id: 0,
            first_name: "Test".to_string(),
            last_name: email.split('@').next().unwrap_or("User").to_string(),
            email: email.to_string(),
            password_hash: bcrypt::hash(password, 4).expect("hash"),
            kind,
            client_id,
            theme: "default".to_string(),
            created_at: Utc::now(),
        };
        self.state.users.create(&user).await.expect("create user")
    }

    /// Log in through the real endpoint, returning the session cookie pair
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body = format!("email={email}&password={password}");
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header(
                        header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    )
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("login response");
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "login failed");

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .expect("session cookie");
        cookie
            .split(';')
            .next()
            .expect("cookie pair")
            .to_string()
    }

    /// Send a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("response")
    }
}

/// GET with a session cookie
pub fn get(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request")
}

/// JSON request with a session cookie
pub fn json(method: &str, uri: &str, cookie: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Collect a response body into a string
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

/// Collect a response body and parse it as JSON
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let text = body_string(response).await;
    serde_json::from_str(&text).expect("json body")
}
