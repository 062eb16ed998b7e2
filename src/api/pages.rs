use axum::response::Html;

use crate::utils::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// A one-off message rendered at the top of a page.
#[derive(Debug, Clone)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

pub fn render_flashes(flashes: &[Flash]) -> String {
    if flashes.is_empty() {
        return String::new();
    }

    let mut out = String::from("<ul class=\"flashes\">");
    for flash in flashes {
        let class = match flash.kind {
            FlashKind::Success => "flash-message success",
            FlashKind::Error => "flash-message error",
        };
        out.push_str(&format!(
            "<li class=\"{}\">{}</li>",
            class,
            escape_html(&flash.message)
        ));
    }
    out.push_str("</ul>");
    out
}

pub fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>
<html>
<head><meta charset=\"utf-8\"><title>{title} - spotyt</title></head>
<body>
<nav><a href=\"/\">Home</a> | <a href=\"/dashboard\">Dashboard</a> | <a href=\"/login\">Log in</a> | <a href=\"/register\">Sign up</a> | <a href=\"/logout\">Log out</a></nav>
{body}
</body>
</html>",
        title = escape_html(title),
        body = body
    ))
}

pub async fn index() -> Html<String> {
    layout(
        "Welcome",
        "<h1>spotyt</h1>
<p>Paste a Spotify playlist link on your dashboard, spotyt finds every track on YouTube and keeps the audio ready for download.</p>
<p><a href=\"/register\">Create an account</a> or <a href=\"/login\">log in</a>.</p>",
    )
}
