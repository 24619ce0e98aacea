use std::sync::Arc;

use axum::Form;
use axum::extract::{FromRef, State};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};
use tracing::info;

use warbler_db::{Database, SignupError};
use warbler_types::CURR_USER_KEY;
use warbler_types::api::{LoginForm, SignupForm};

use crate::error::ApiResult;
use crate::pages::{flash_redirect, redirect};

/// Shared handler state. Newtype over the `Arc` so the `Key`
/// extraction impl below sits on a local type.
#[derive(Clone)]
pub struct AppState(pub Arc<AppStateInner>);

pub struct AppStateInner {
    pub db: Database,
    pub key: Key,
}

impl std::ops::Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &AppStateInner {
        &self.0
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}

/// Store the user id in the signed session cookie and send the client
/// back to the landing page.
fn start_session(jar: SignedCookieJar, user_id: i64) -> Response {
    let jar = jar.add(
        Cookie::build((CURR_USER_KEY, user_id.to_string()))
            .path("/")
            .http_only(true)
            .build(),
    );
    (jar, redirect("/")).into_response()
}

pub async fn signup(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<SignupForm>,
) -> ApiResult<Response> {
    let db = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        db.db.signup(
            &form.username,
            &form.email,
            &form.password,
            form.image_url.as_deref(),
        )
    })
    .await?;

    match result {
        Ok(user) => {
            info!("new user signed up: {}", user.username);
            Ok(start_session(jar, user.id))
        }
        Err(e @ (SignupError::UsernameTaken | SignupError::EmailTaken)) => {
            Ok(flash_redirect(jar, &e.to_string(), "/"))
        }
        Err(SignupError::Store(e)) => Err(e.into()),
    }
}

pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    let db = state.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        db.db.authenticate(&form.username, &form.password)
    })
    .await??;

    // Unknown username and wrong password are indistinguishable here.
    match outcome.user() {
        Some(user) => Ok(start_session(jar, user.id)),
        None => Ok(flash_redirect(jar, "Invalid credentials.", "/")),
    }
}

pub async fn logout(jar: SignedCookieJar) -> Response {
    // Removal must carry the same path as the set cookie.
    let jar = jar.remove(Cookie::build(CURR_USER_KEY).path("/").build());
    (jar, redirect("/")).into_response()
}
