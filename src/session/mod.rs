//! Per-connection session state
//!
//! A [`Session`] holds everything one browser connection needs: the chat
//! transcript, the theme, the auth token, the current page and the busy
//! flag. Sessions are never persisted; [`SessionStore`] keeps them in
//! memory keyed by an opaque id.

pub mod store;

pub use store::{SessionHandle, SessionId, SessionStore};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Text typed by the user
    User,
    /// Text produced by the model (or an inline error)
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One immutable transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: Role,
    content: String,
}

impl ChatMessage {
    /// Create a message authored by the user
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a message authored by the assistant
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Message author
    pub fn role(&self) -> Role {
        self.role
    }

    /// Message text
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Light palette
    #[default]
    Light,
    /// Dark palette
    Dark,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Which page the session is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Login form
    #[default]
    Login,
    /// Registration form
    Register,
    /// Chat transcript and input
    Chat,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Register => write!(f, "register"),
            Self::Chat => write!(f, "chat"),
        }
    }
}

/// Severity of a one-shot banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Green banner
    Success,
    /// Red banner
    Error,
}

/// Banner shown once on the next render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Banner colour
    pub kind: NoticeKind,
    /// Banner text
    pub text: String,
}

impl Notice {
    /// Success banner
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    /// Error banner
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Mutable state for one connection
///
/// Invariant: `page == Page::Chat` only while `auth_token` is set, and the
/// transcript is empty whenever the token is cleared.
///
/// `submission` changes on every accepted question, every logout and every
/// history clear. An in-flight completion may only write its reply while
/// the counter still holds the value it saw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    transcript: Vec<ChatMessage>,
    theme: Theme,
    #[serde(skip_serializing)]
    auth_token: Option<String>,
    page: Page,
    busy: bool,
    draft: Option<String>,
    notice: Option<Notice>,
    #[serde(skip_serializing)]
    submission: u64,
}

impl Session {
    /// A fresh session on the login page
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript in chronological order
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Current theme
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Current page
    pub fn page(&self) -> Page {
        self.page
    }

    /// Whether a completion call is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the session holds an auth token
    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    /// The auth token, if logged in
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// Pre-filled question for the chat input
    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    /// Banner waiting for the next render
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Identifies the latest question or reset
    pub fn submission(&self) -> u64 {
        self.submission
    }

    /// Store a token and switch to the chat page
    pub fn authenticate(&mut self, token: String) {
        self.auth_token = Some(token);
        self.page = Page::Chat;
    }

    /// Drop the token, go back to login and forget the transcript
    pub fn reset_auth(&mut self) {
        self.auth_token = None;
        self.page = Page::Login;
        self.transcript.clear();
        self.draft = None;
        self.busy = false;
        self.bump_submission();
    }

    /// Navigate between the login and register pages
    ///
    /// Switching to [`Page::Chat`] is refused without a token; use
    /// [`Session::authenticate`] instead.
    pub fn show(&mut self, page: Page) -> bool {
        if page == Page::Chat && !self.is_authenticated() {
            return false;
        }
        self.page = page;
        true
    }

    /// Flip between light and dark
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Empty the transcript without logging out
    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
        self.bump_submission();
    }

    /// Append a user message
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.transcript.push(ChatMessage::user(content));
        self.bump_submission();
    }

    fn bump_submission(&mut self) {
        self.submission = self.submission.wrapping_add(1);
    }

    /// Append an assistant message
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.transcript.push(ChatMessage::assistant(content));
    }

    /// Set or clear the busy flag
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// Set the pre-filled question
    pub fn set_draft(&mut self, draft: Option<String>) {
        self.draft = draft;
    }

    /// Queue a banner for the next render
    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Remove and return the queued banner
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new();
        assert!(session.transcript().is_empty());
        assert_eq!(session.theme(), Theme::Light);
        assert!(session.auth_token().is_none());
        assert_eq!(session.page(), Page::Login);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_reset_auth_from_any_state() {
        let mut session = Session::new();
        session.authenticate("tok".to_string());
        session.push_user("q");
        session.push_assistant("a");
        session.set_busy(true);
        session.toggle_theme();

        session.reset_auth();

        assert!(session.auth_token().is_none());
        assert_eq!(session.page(), Page::Login);
        assert!(session.transcript().is_empty());
        assert!(!session.is_busy());
        // Theme survives logout
        assert_eq!(session.theme(), Theme::Dark);
    }

    #[test]
    fn test_toggle_theme_twice_is_identity() {
        let mut session = Session::new();
        let original = session.theme();
        session.toggle_theme();
        assert_ne!(session.theme(), original);
        session.toggle_theme();
        assert_eq!(session.theme(), original);
    }

    #[test]
    fn test_show_chat_requires_token() {
        let mut session = Session::new();
        assert!(!session.show(Page::Chat));
        assert_eq!(session.page(), Page::Login);

        assert!(session.show(Page::Register));
        assert_eq!(session.page(), Page::Register);
    }

    #[test]
    fn test_take_notice_is_one_shot() {
        let mut session = Session::new();
        session.set_notice(Notice::error("Invalid credentials"));
        assert_eq!(
            session.take_notice(),
            Some(Notice::error("Invalid credentials"))
        );
        assert!(session.take_notice().is_none());
    }

    #[test]
    fn test_transcript_keeps_order_and_roles() {
        let mut session = Session::new();
        session.push_user("hello");
        session.push_assistant("hi");
        let roles: Vec<Role> = session.transcript().iter().map(|m| m.role()).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert_eq!(session.transcript()[1].content(), "hi");
    }

    #[test]
    fn test_submission_changes_on_question_and_reset() {
        let mut session = Session::new();
        session.authenticate("tok".to_string());

        let start = session.submission();
        session.push_user("one");
        let after_one = session.submission();
        assert_ne!(after_one, start);

        session.push_assistant("reply");
        assert_eq!(session.submission(), after_one);

        session.reset_auth();
        let after_reset = session.submission();
        assert_ne!(after_reset, after_one);

        session.authenticate("tok".to_string());
        session.push_user("two");
        assert_ne!(session.submission(), after_one);
        assert_ne!(session.submission(), after_reset);

        let before_clear = session.submission();
        session.clear_transcript();
        assert_ne!(session.submission(), before_clear);
    }

    #[test]
    fn test_serialized_session_hides_token() {
        let mut session = Session::new();
        session.authenticate("secret-token".to_string());
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("secret-token"));
        assert!(json.contains("\"page\":\"chat\""));
    }
}
