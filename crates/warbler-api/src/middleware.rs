use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::debug;

use warbler_types::{CURR_USER_KEY, CurrentUser};

use crate::auth::AppState;
use crate::error::ApiResult;
use crate::pages::flash_redirect;

/// Flash shown for every authorization failure, whatever its cause.
pub const ACCESS_UNAUTHORIZED: &str = "Access unauthorized.";

/// Resolve the session cookie to an existing user and attach it as a
/// [`CurrentUser`] extension. No cookie, a garbled value, or an id
/// that no longer resolves to a user all degrade the same way: flash
/// plus redirect to the landing page. Store faults are not anonymity;
/// they propagate as a 500.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut req: Request,
    next: Next,
) -> ApiResult<Response> {
    let user_id = jar
        .get(CURR_USER_KEY)
        .and_then(|cookie| cookie.value().parse::<i64>().ok());

    let user = match user_id {
        Some(id) => {
            let db = state.clone();
            tokio::task::spawn_blocking(move || db.db.get_user_by_id(id)).await??
        }
        None => None,
    };

    match user {
        Some(user) => {
            req.extensions_mut().insert(CurrentUser {
                id: user.id,
                username: user.username,
            });
            Ok(next.run(req).await)
        }
        None => {
            debug!("rejecting request without a valid session: {}", req.uri());
            Ok(flash_redirect(jar, ACCESS_UNAUTHORIZED, "/"))
        }
    }
}
