//! Web surface
//!
//! Endpoints:
//! - GET / - Render the session's current page
//! - POST /login, /register - Submit the auth forms
//! - POST /nav/register, /nav/login - Switch between the auth forms
//! - POST /chat - Ask a question
//! - POST /example/:index - Pre-fill an example question
//! - POST /theme, /clear, /logout - Sidebar buttons
//! - GET /healthz - Liveness probe
//!
//! Every POST dispatches one [`Action`] and answers `303 See Other` to `/`,
//! so a refresh never resubmits a form.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Form, Path, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::app::{Action, ChatApp};
use crate::config::ServerConfig;
use crate::error::Result;
use crate::render::{self, UiSettings};
use crate::session::store::SESSION_COOKIE;
use crate::session::{SessionHandle, SessionId, SessionStore};

/// Shared server state
pub struct AppState {
    sessions: SessionStore,
    app: ChatApp,
    ui: UiSettings,
}

impl AppState {
    /// Bundle the state machine and presentation settings
    pub fn new(app: ChatApp, ui: UiSettings) -> Self {
        Self {
            sessions: SessionStore::new(),
            app,
            ui,
        }
    }

    /// Replace the session store, e.g. to use a configured idle timeout
    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }

    /// Live sessions
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
struct RegisterForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    confirm: String,
}

#[derive(Debug, Deserialize)]
struct ChatForm {
    #[serde(default)]
    question: String,
}

/// Failure that renders the generic error page
struct PageError(anyhow::Error);

impl From<anyhow::Error> for PageError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render::error_page("Error")),
        )
            .into_response()
    }
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/healthz", get(healthz_handler))
        .route("/login", post(login_handler))
        .route("/register", post(register_handler))
        .route("/nav/register", post(show_register_handler))
        .route("/nav/login", post(show_login_handler))
        .route("/chat", post(chat_handler))
        .route("/example/:index", post(example_handler))
        .route("/theme", post(theme_handler))
        .route("/clear", post(clear_handler))
        .route("/logout", post(logout_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until the process exits
///
/// # Errors
///
/// Returns error if the address cannot be bound or the server fails
pub async fn start_server(
    config: &ServerConfig,
    state: Arc<AppState>,
    open_browser: bool,
) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let url = format!("http://{}", listener.local_addr()?);

    tracing::info!("Parley listening on {}", url);

    if open_browser {
        if let Err(e) = open::that(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    axum::serve(listener, build_router(state))
        .await
        .context("Server error")?;

    Ok(())
}

fn extract_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    for part in raw.split(';') {
        let mut pieces = part.trim().splitn(2, '=');
        let key = pieces.next()?.trim();
        let value = pieces.next()?.trim();

        if key == cookie_name && !value.is_empty() {
            return Some(value.to_string());
        }
    }

    None
}

fn session_cookie(id: &SessionId) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

async fn session_for(state: &AppState, headers: &HeaderMap) -> (SessionId, SessionHandle, bool) {
    let id = extract_cookie_value(headers, SESSION_COOKIE)
        .and_then(|raw| Uuid::parse_str(&raw).ok());
    state.sessions.get_or_init(id).await
}

fn with_cookie(mut response: Response, id: &SessionId, created: bool) -> Response {
    if created {
        if let Ok(value) = HeaderValue::from_str(&session_cookie(id)) {
            response.headers_mut().insert(SET_COOKIE, value);
        }
    }
    response
}

async fn apply(
    state: &AppState,
    headers: &HeaderMap,
    action: Action,
) -> std::result::Result<Response, PageError> {
    let (id, handle, created) = session_for(state, headers).await;
    state.app.dispatch(&handle, action).await?;
    Ok(with_cookie(Redirect::to("/").into_response(), &id, created))
}

async fn index_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (id, handle, created) = session_for(&state, &headers).await;
    let html = {
        let mut session = handle.lock().await;
        let html = render::page(&session, &state.ui);
        session.take_notice();
        html
    };
    with_cookie(Html(html).into_response(), &id, created)
}

async fn healthz_handler() -> &'static str {
    "ok"
}

async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> std::result::Result<Response, PageError> {
    let action = Action::Login {
        email: form.email,
        password: form.password,
    };
    apply(&state, &headers, action).await
}

async fn register_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> std::result::Result<Response, PageError> {
    // Without the confirm field on the page the password stands in for it
    let confirm = if state.ui.require_confirmation {
        form.confirm
    } else {
        form.password.clone()
    };
    let action = Action::Register {
        username: form.username,
        email: form.email,
        password: form.password,
        confirm,
    };
    apply(&state, &headers, action).await
}

async fn show_register_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> std::result::Result<Response, PageError> {
    apply(&state, &headers, Action::ShowRegister).await
}

async fn show_login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> std::result::Result<Response, PageError> {
    apply(&state, &headers, Action::ShowLogin).await
}

async fn chat_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ChatForm>,
) -> std::result::Result<Response, PageError> {
    let action = Action::Submit {
        question: form.question,
    };
    apply(&state, &headers, action).await
}

async fn example_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(index): Path<usize>,
) -> std::result::Result<Response, PageError> {
    apply(&state, &headers, Action::UseExample { index }).await
}

async fn theme_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> std::result::Result<Response, PageError> {
    apply(&state, &headers, Action::ToggleTheme).await
}

async fn clear_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> std::result::Result<Response, PageError> {
    apply(&state, &headers, Action::ClearHistory).await
}

async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> std::result::Result<Response, PageError> {
    apply(&state, &headers, Action::Logout).await
}
