//! Integration tests for login and logout

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{body_string, get, spawn, TEAM_PASSWORD};

const TEAM_EMAIL: &str = "agent@example.com";

fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("email={email}&password={password}")))
        .unwrap()
}

#[tokio::test]
async fn test_login_sets_session_and_redirects() {
    let app = spawn().await;
    app.team_user(TEAM_EMAIL).await;

    let response = app.send(login_request(TEAM_EMAIL, TEAM_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/tickets")
    );
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("helpdesk_session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let app = spawn().await;
    app.team_user(TEAM_EMAIL).await;

    let response = app.send(login_request(TEAM_EMAIL, "not-the-password")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_string(response)
        .await
        .contains("<li>Invalid email or password</li>"));

    // Unknown accounts get the same answer as wrong passwords.
    let response = app
        .send(login_request("nobody@example.com", TEAM_PASSWORD))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_string(response)
        .await
        .contains("<li>Invalid email or password</li>"));
}

#[tokio::test]
async fn test_logout_invalidates_the_session() {
    let app = spawn().await;
    app.team_user(TEAM_EMAIL).await;
    let cookie = app.login(TEAM_EMAIL, TEAM_PASSWORD).await;

    let response = app.send(get("/tickets", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/login")
    );

    // The token is gone server side, so the old cookie no longer works.
    let response = app.send(get("/tickets", &cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/login")
    );
}

#[tokio::test]
async fn test_root_redirects_to_tickets() {
    let app = spawn().await;
    let response = app
        .send(
            Request::builder()
                .method("GET")
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/tickets")
    );
}
