use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
    response::Redirect,
};

use super::AppState;
use crate::{management::SESSION_MAX_AGE_SECS, types::User, utils};

pub const SESSION_COOKIE: &str = "spotyt_session";

/// The logged-in user. Rejects with a redirect to `/login`.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(state) = parts.extensions.get::<AppState>() else {
            return Err(Redirect::to("/login"));
        };
        let Some(token) = session_token(&parts.headers) else {
            return Err(Redirect::to("/login"));
        };

        match state.store.session_user(token) {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            _ => Err(Redirect::to("/login")),
        }
    }
}

pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookie| utils::cookie_value(cookie, SESSION_COOKIE))
}

pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={SESSION_MAX_AGE_SECS}")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}
