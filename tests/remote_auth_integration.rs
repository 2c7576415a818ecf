//! Remote authentication against a mocked auth API
//!
//! Covers the login/register wire format and how the chat state machine
//! reacts to each outcome.

mod common;

use std::sync::Arc;

use parley::auth::{AuthGateway, RemoteAuth};
use parley::config::Config;
use parley::session::{Notice, Page, Session};
use parley::Action;
use serde_json::json;
use tokio::sync::Mutex;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_base(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

#[tokio::test]
async fn test_login_returns_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .and(body_string_contains("email=user%40x.com"))
        .and(body_string_contains("password=pw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "jwt-abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = RemoteAuth::new(&api_base(&server)).unwrap();
    assert_eq!(
        auth.login("user@x.com", "pw").await.as_deref(),
        Some("jwt-abc")
    );
}

#[tokio::test]
async fn test_login_200_without_access_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "refresh": "r" })))
        .mount(&server)
        .await;

    let auth = RemoteAuth::new(&api_base(&server)).unwrap();
    assert!(auth.login("user@x.com", "pw").await.is_none());
}

#[tokio::test]
async fn test_rejected_login_shows_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "nope" })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = Arc::new(RemoteAuth::new(&api_base(&server)).unwrap());
    assert!(auth.login("user@x.com", "bad").await.is_none());

    let app = common::chat_app(&Config::default(), auth);
    let handle = Arc::new(Mutex::new(Session::new()));
    app.dispatch(
        &handle,
        Action::Login {
            email: "user@x.com".to_string(),
            password: "bad".to_string(),
        },
    )
    .await
    .unwrap();

    let mut session = handle.lock().await;
    assert!(session.auth_token().is_none());
    assert_eq!(session.page(), Page::Login);
    assert_eq!(
        session.take_notice(),
        Some(Notice::error("Invalid credentials"))
    );
}

#[tokio::test]
async fn test_register_created_returns_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register/"))
        .and(body_string_contains("username=alice"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = Arc::new(RemoteAuth::new(&api_base(&server)).unwrap());
    let app = common::chat_app(&Config::default(), auth);
    let handle = Arc::new(Mutex::new(Session::new()));
    app.dispatch(&handle, Action::ShowRegister).await.unwrap();

    app.dispatch(
        &handle,
        Action::Register {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "pw".to_string(),
            confirm: "pw".to_string(),
        },
    )
    .await
    .unwrap();

    let mut session = handle.lock().await;
    assert_eq!(session.page(), Page::Login);
    assert_eq!(
        session.take_notice(),
        Some(Notice::success("Account created! Please login."))
    );
}

#[tokio::test]
async fn test_register_non_201_keeps_register_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("already exists"))
        .mount(&server)
        .await;

    let auth = RemoteAuth::new(&api_base(&server)).unwrap();
    let outcome = auth.register("alice", "a@x.com", "pw").await;
    assert_eq!(outcome.status_code, 200);
    assert!(!outcome.is_success());
    assert_eq!(outcome.message, "already exists");
}

#[tokio::test]
async fn test_mismatched_confirmation_never_reaches_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let auth = Arc::new(RemoteAuth::new(&api_base(&server)).unwrap());
    let app = common::chat_app(&Config::default(), auth);
    let handle = Arc::new(Mutex::new(Session::new()));
    app.dispatch(&handle, Action::ShowRegister).await.unwrap();

    app.dispatch(
        &handle,
        Action::Register {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "secret".to_string(),
            confirm: "different".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(handle.lock().await.page(), Page::Register);
    server.verify().await;
}
