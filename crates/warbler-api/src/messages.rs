use axum::Extension;
use axum::Form;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::info;

use warbler_db::StoreError;
use warbler_types::CurrentUser;
use warbler_types::api::NewMessageForm;

use crate::auth::AppState;
use crate::error::ApiResult;
use crate::middleware::ACCESS_UNAUTHORIZED;
use crate::pages::{flash_redirect, redirect};

pub async fn add_message(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<NewMessageForm>,
) -> ApiResult<Response> {
    let db = state.clone();
    let author_id = user.id;
    let result =
        tokio::task::spawn_blocking(move || db.db.create_message(&form.text, author_id)).await?;

    match result {
        Ok(_) => Ok(redirect(&format!("/users/{}", user.id))),
        Err(StoreError::EmptyText) => Ok(flash_redirect(jar, "Message text required.", "/")),
        Err(e) => Err(e.into()),
    }
}

/// Only the owner may delete; anyone else gets the uniform
/// unauthorized redirect and the message stays put.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: SignedCookieJar,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Response> {
    let db = state.clone();
    let message = tokio::task::spawn_blocking(move || db.db.get_message(id)).await??;

    let Some(message) = message else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    if message.user_id != user.id {
        return Ok(flash_redirect(jar, ACCESS_UNAUTHORIZED, "/"));
    }

    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.delete_message(id)).await??;

    info!("user {} deleted message {}", user.id, id);
    Ok(redirect(&format!("/users/{}", user.id)))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Response> {
    let db = state.clone();
    let message = tokio::task::spawn_blocking(move || db.db.get_message(id)).await??;

    if message.is_none() {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let db = state.clone();
    let user_id = user.id;
    let added = tokio::task::spawn_blocking(move || db.db.toggle_like(user_id, id)).await??;

    info!(
        "user {} {} message {}",
        user.id,
        if added { "liked" } else { "unliked" },
        id
    );
    Ok(redirect("/"))
}
