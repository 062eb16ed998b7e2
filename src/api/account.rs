use axum::{
    Extension, Form,
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::{
    AppState,
    pages::{Flash, layout, render_flashes},
    session::{expired_session_cookie, session_cookie, session_token},
};
use crate::{error::Error, info, utils, warning};

const USERNAME_MIN_LEN: usize = 4;
const USERNAME_MAX_LEN: usize = 80;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Registration rules: username of 4 to 80 characters, non-empty password.
    pub fn validate_registration(&self) -> Result<(), Error> {
        let len = self.username.trim().chars().count();
        if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
            return Err(Error::Validation(format!(
                "Username must be between {} and {} characters long.",
                USERNAME_MIN_LEN, USERNAME_MAX_LEN
            )));
        }
        if self.password.is_empty() {
            return Err(Error::Validation("Password is required.".to_string()));
        }
        Ok(())
    }
}

fn account_page(title: &str, action: &str, submit: &str, flashes: &[Flash]) -> Html<String> {
    let body = format!(
        "<h1>{title}</h1>
{flashes}
<form method=\"post\" action=\"{action}\">
  <label>Username <input name=\"username\" required></label>
  <label>Password <input name=\"password\" type=\"password\" required></label>
  <button type=\"submit\">{submit}</button>
</form>",
        flashes = render_flashes(flashes)
    );
    layout(title, &body)
}

pub async fn register_form() -> Html<String> {
    account_page("Sign Up", "/register", "Sign Up", &[])
}

pub async fn register(
    Extension(state): Extension<AppState>,
    Form(form): Form<Credentials>,
) -> Response {
    if let Err(e) = form.validate_registration() {
        return account_page("Sign Up", "/register", "Sign Up", &[Flash::error(e.to_string())])
            .into_response();
    }

    let password_hash = utils::hash_password(&form.password);
    match state.store.create_user(form.username.trim(), &password_hash) {
        Ok(user) => {
            info!("Registered user {}", user.username);
            Redirect::to("/login").into_response()
        }
        Err(e @ Error::Validation(_)) => {
            account_page("Sign Up", "/register", "Sign Up", &[Flash::error(e.to_string())])
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn login_form() -> Html<String> {
    account_page("Log In", "/login", "Log In", &[])
}

pub async fn login(
    Extension(state): Extension<AppState>,
    Form(form): Form<Credentials>,
) -> Response {
    let user = match state.store.find_user_by_name(form.username.trim()) {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    let Some(user) = user.filter(|u| utils::verify_password(&form.password, &u.password_hash))
    else {
        warning!("Failed login for {}", form.username);
        return account_page(
            "Log In",
            "/login",
            "Log In",
            &[Flash::error("Invalid username or password. Please try again.")],
        )
        .into_response();
    };

    match state.store.create_session(user.id) {
        Ok(token) => (
            [(header::SET_COOKIE, session_cookie(&token))],
            Redirect::to("/dashboard"),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn logout(Extension(state): Extension<AppState>, headers: HeaderMap) -> Response {
    let Some(token) = session_token(&headers) else {
        return Redirect::to("/login").into_response();
    };

    if let Err(e) = state.store.delete_session(token) {
        warning!("Cannot delete session: {}", e);
    }

    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}
