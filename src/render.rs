//! HTML rendering
//!
//! [`page`] turns a session snapshot into one complete HTML document. It
//! performs no I/O and never mutates the session; the caller takes the
//! one-shot notice beforehand if it should be consumed.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::config::Config;
use crate::session::{NoticeKind, Page, Role, Session, Theme};

/// Static presentation settings
#[derive(Debug, Clone)]
pub struct UiSettings {
    /// Chat page heading
    pub title: String,
    /// Line under the heading
    pub caption: String,
    /// Sidebar example questions
    pub examples: Vec<String>,
    /// Show the confirm-password field on register
    pub require_confirmation: bool,
}

impl From<&Config> for UiSettings {
    fn from(config: &Config) -> Self {
        Self {
            title: config.ui.title.clone(),
            caption: config.ui.caption.clone(),
            examples: config.chat.examples.clone(),
            require_confirmation: config.auth.require_confirmation,
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Colours for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub sidebar_background: &'static str,
    pub sidebar_text: &'static str,
    pub input_bar: &'static str,
    pub input_text: &'static str,
    pub input_background: &'static str,
    pub input_border: &'static str,
    pub button_background: &'static str,
    pub button_text: &'static str,
    pub button_border: &'static str,
    pub user_bubble: &'static str,
    pub user_text: &'static str,
    pub assistant_bubble: &'static str,
    pub assistant_text: &'static str,
}

const LIGHT: Palette = Palette {
    background: "#ffffff",
    text: "#333333",
    sidebar_background: "#f0f2f6",
    sidebar_text: "#333333",
    input_bar: "#ffffff",
    input_text: "#333333",
    input_background: "#ffffff",
    input_border: "#cccccc",
    button_background: "#4CAF50",
    button_text: "#ffffff",
    button_border: "#4CAF50",
    user_bubble: "#005f73",
    user_text: "#ffffff",
    assistant_bubble: "#e8f5e9",
    assistant_text: "#333333",
};

const DARK: Palette = Palette {
    background: "#1a1a1a",
    text: "#ffffff",
    sidebar_background: "#2d2d2d",
    sidebar_text: "#ffffff",
    input_bar: "#2d2d2d",
    input_text: "#ffffff",
    input_background: "#404040",
    input_border: "#555555",
    button_background: "#4CAF50",
    button_text: "#ffffff",
    button_border: "#4CAF50",
    user_bubble: "#004456",
    user_text: "#ffffff",
    assistant_bubble: "#2d3b2d",
    assistant_text: "#ffffff",
};

impl Palette {
    /// Palette for `theme`
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => LIGHT,
            Theme::Dark => DARK,
        }
    }

    fn stylesheet(&self) -> String {
        format!(
            r#"
body {{ margin: 0; font-family: system-ui, sans-serif; background-color: {bg}; color: {fg}; }}
.layout {{ display: flex; min-height: 100vh; }}
.sidebar {{ width: 260px; padding: 1rem; background-color: {side_bg}; color: {side_fg}; }}
.sidebar form {{ margin: 0 0 0.5rem 0; }}
.sidebar button {{ width: 100%; }}
main {{ flex: 1; padding: 1.5rem 1.5rem 100px 1.5rem; }}
.auth-card {{ max-width: 420px; margin: 4rem auto; display: grid; gap: 0.6rem; }}
.auth-card h2 {{ text-align: center; }}
label {{ font-size: 0.85rem; }}
input {{ color: {in_fg}; background-color: {in_bg}; border: 1px solid {in_border}; padding: 0.5rem; border-radius: 6px; }}
button {{ background-color: {btn_bg}; color: {btn_fg}; border: 1px solid {btn_border}; padding: 0.5rem 0.9rem; border-radius: 6px; cursor: pointer; }}
button:disabled, input:disabled {{ opacity: 0.5; cursor: not-allowed; }}
.chat-input {{ position: fixed; bottom: 0; left: 260px; right: 0; padding: 1rem; background: {bar}; z-index: 100; box-shadow: 0 -2px 10px rgba(0,0,0,0.1); display: flex; gap: 0.5rem; }}
.chat-input input {{ flex: 1; }}
.message {{ padding: 12px 16px; margin: 8px 0; border-radius: 15px; max-width: 80%; white-space: pre-wrap; animation: fadeIn 0.3s ease-in; }}
.user-message {{ background: {user_bg}; color: {user_fg}; margin-left: auto; }}
.assistant-message {{ background: {asst_bg}; color: {asst_fg}; margin-right: auto; }}
.notice {{ padding: 0.6rem 1rem; border-radius: 6px; margin-bottom: 1rem; }}
.notice.success {{ background: #d4edda; color: #155724; }}
.notice.error {{ background: #f8d7da; color: #721c24; }}
.caption {{ opacity: 0.7; }}
@keyframes fadeIn {{ from {{ opacity: 0; transform: translateY(20px); }} to {{ opacity: 1; transform: translateY(0); }} }}
@media (max-width: 600px) {{ .message {{ max-width: 90%; padding: 10px 12px; font-size: 14px; }} .chat-input {{ padding: 0.5rem; left: 0; }} .sidebar {{ display: none; }} }}
"#,
            bg = self.background,
            fg = self.text,
            side_bg = self.sidebar_background,
            side_fg = self.sidebar_text,
            bar = self.input_bar,
            in_fg = self.input_text,
            in_bg = self.input_background,
            in_border = self.input_border,
            btn_bg = self.button_background,
            btn_fg = self.button_text,
            btn_border = self.button_border,
            user_bg = self.user_bubble,
            user_fg = self.user_text,
            asst_bg = self.assistant_bubble,
            asst_fg = self.assistant_text,
        )
    }
}

/// Label of the theme toggle for the current theme
pub fn theme_toggle_label(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "🌙 Night Mode",
        Theme::Dark => "☀️ Day Mode",
    }
}

/// Render the full document for the session's current page
pub fn page(session: &Session, ui: &UiSettings) -> String {
    let palette = Palette::for_theme(session.theme());
    let content = match session.page() {
        Page::Login => login_page(),
        Page::Register => register_page(ui.require_confirmation),
        Page::Chat => chat_page(session, ui),
    };

    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (ui.title) }
                style { (PreEscaped(palette.stylesheet())) }
            }
            body data-theme=(theme_name(session.theme())) {
                @if session.page() == Page::Chat {
                    div class="layout" {
                        (sidebar(session, ui))
                        main {
                            (notice(session))
                            (content)
                        }
                    }
                } @else {
                    main {
                        (notice(session))
                        (content)
                        form method="post" action="/theme" {
                            button type="submit" { (theme_toggle_label(session.theme())) }
                        }
                    }
                }
            }
        }
    };

    markup.into_string()
}

/// Minimal document for a failed request
pub fn error_page(title: &str) -> String {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (PreEscaped(LIGHT.stylesheet())) }
            }
            body {
                main {
                    div class="notice error" { "Something went wrong while generating a reply." }
                    a href="/" { "Back to chat" }
                }
            }
        }
    };
    markup.into_string()
}

fn theme_name(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    }
}

fn notice(session: &Session) -> Markup {
    html! {
        @if let Some(notice) = session.notice() {
            @let class = match notice.kind {
                NoticeKind::Success => "notice success",
                NoticeKind::Error => "notice error",
            };
            div class=(class) role="status" { (notice.text) }
        }
    }
}

fn login_page() -> Markup {
    html! {
        section class="auth-card" {
            h2 { "🔐  Login" }
            form method="post" action="/login" class="auth-card" {
                label for="email" { "Email" }
                input id="email" type="email" name="email";
                label for="password" { "Password" }
                input id="password" type="password" name="password";
                button type="submit" { "Login" }
            }
            form method="post" action="/nav/register" {
                button type="submit" { "Go to Register" }
            }
        }
    }
}

fn register_page(require_confirmation: bool) -> Markup {
    html! {
        section class="auth-card" {
            h2 { "📝  Register" }
            form method="post" action="/register" class="auth-card" {
                label for="username" { "Username" }
                input id="username" type="text" name="username";
                label for="email" { "Email" }
                input id="email" type="email" name="email";
                label for="password" { "Password" }
                input id="password" type="password" name="password";
                @if require_confirmation {
                    label for="confirm" { "Confirm Password" }
                    input id="confirm" type="password" name="confirm";
                }
                button type="submit" { "Register" }
            }
            form method="post" action="/nav/login" {
                button type="submit" { "Back to Login" }
            }
        }
    }
}

fn sidebar(session: &Session, ui: &UiSettings) -> Markup {
    let busy = session.is_busy();
    html! {
        aside class="sidebar" {
            form method="post" action="/theme" {
                button type="submit" { (theme_toggle_label(session.theme())) }
            }
            form method="post" action="/clear" {
                button type="submit" disabled[busy] { "🧹 Clear Chat History" }
            }
            form method="post" action="/logout" {
                button type="submit" { "🚪 Logout" }
            }
            h3 { "Try an example" }
            @for (index, example) in ui.examples.iter().enumerate() {
                form method="post" action=(format!("/example/{}", index)) {
                    button type="submit" disabled[busy] { (example) }
                }
            }
        }
    }
}

fn chat_page(session: &Session, ui: &UiSettings) -> Markup {
    let busy = session.is_busy();
    html! {
        header {
            h1 { (ui.title) }
            p class="caption" { (ui.caption) }
        }
        section class="transcript" {
            @for message in session.transcript() {
                @let class = match message.role() {
                    Role::User => "message user-message",
                    Role::Assistant => "message assistant-message",
                };
                div class=(class) { (message.content()) }
            }
            @if busy {
                div class="message assistant-message" { "Thinking..." }
            }
        }
        form method="post" action="/chat" class="chat-input" {
            input type="text" name="question" placeholder="Type your message here..."
                value=[session.draft()] disabled[busy] autofocus;
            button type="submit" disabled[busy] { "Generate" }
        }
    }
}
