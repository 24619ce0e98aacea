use axum::Extension;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::info;

use warbler_db::StoreError;
use warbler_db::models::{MessageRow, UserRow};
use warbler_types::CurrentUser;

use crate::auth::AppState;
use crate::error::ApiResult;
use crate::pages::{escape, format_timestamp, page, redirect};

/// Profile page: the user's messages, newest first. Message-delete
/// redirects land here.
pub async fn profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let db = state.clone();
    let found = tokio::task::spawn_blocking(
        move || -> Result<Option<(UserRow, Vec<MessageRow>)>, StoreError> {
            let user = db.db.get_user_by_id(id)?;
            match user {
                Some(user) => {
                    let messages = db.db.messages_for_user(user.id)?;
                    Ok(Some((user, messages)))
                }
                None => Ok(None),
            }
        },
    )
    .await??;

    let Some((user, messages)) = found else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let items: String = messages
        .iter()
        .map(|m| {
            format!(
                "<li class=\"message\">{} <span class=\"timestamp\">{}</span></li>",
                escape(&m.text),
                format_timestamp(&m.created_at),
            )
        })
        .collect();

    let body = format!(
        "<h1>@{}</h1><ul class=\"messages\">{}</ul>",
        escape(&user.username),
        items,
    );
    Ok(page(&format!("@{}", user.username), None, &body).into_response())
}

pub async fn following(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let db = state.clone();
    let found = tokio::task::spawn_blocking(
        move || -> Result<Option<(UserRow, Vec<UserRow>)>, StoreError> {
            let user = db.db.get_user_by_id(id)?;
            match user {
                Some(user) => {
                    let listed = db.db.following(user.id)?;
                    Ok(Some((user, listed)))
                }
                None => Ok(None),
            }
        },
    )
    .await??;

    let Some((user, listed)) = found else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let heading = format!("People @{} follows", user.username);
    Ok(user_list_page(&heading, &listed).into_response())
}

pub async fn followers(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let db = state.clone();
    let found = tokio::task::spawn_blocking(
        move || -> Result<Option<(UserRow, Vec<UserRow>)>, StoreError> {
            let user = db.db.get_user_by_id(id)?;
            match user {
                Some(user) => {
                    let listed = db.db.followers(user.id)?;
                    Ok(Some((user, listed)))
                }
                None => Ok(None),
            }
        },
    )
    .await??;

    let Some((user, listed)) = found else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let heading = format!("Followers of @{}", user.username);
    Ok(user_list_page(&heading, &listed).into_response())
}

pub async fn follow(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Response> {
    let db = state.clone();
    let target = tokio::task::spawn_blocking(move || db.db.get_user_by_id(id)).await??;

    if target.is_none() {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let db = state.clone();
    let follower_id = user.id;
    tokio::task::spawn_blocking(move || db.db.follow(follower_id, id)).await??;

    info!("user {} now follows user {}", user.id, id);
    Ok(redirect(&format!("/users/{}/following", user.id)))
}

pub async fn stop_following(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Response> {
    let db = state.clone();
    let follower_id = user.id;
    tokio::task::spawn_blocking(move || db.db.unfollow(follower_id, id)).await??;

    Ok(redirect(&format!("/users/{}/following", user.id)))
}

fn user_list_page(heading: &str, users: &[UserRow]) -> axum::response::Html<String> {
    let items: String = users
        .iter()
        .map(|u| {
            format!(
                "<li><a href=\"/users/{}\">@{}</a></li>",
                u.id,
                escape(&u.username),
            )
        })
        .collect();

    let body = format!(
        "<h1>{}</h1><ul class=\"user-list\">{}</ul>",
        escape(heading),
        items,
    );
    page(heading, None, &body)
}
