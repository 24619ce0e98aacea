pub mod auth;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod pages;
pub mod users;

use axum::Router;
use axum::routing::{get, post};

pub use auth::{AppState, AppStateInner};

/// Build the full application router. Kept here so the integration
/// tests can drive the app in-process.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(pages::homepage))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/users/{id}", get(users::profile))
        .route("/users/{id}/following", get(users::following))
        .route("/users/{id}/followers", get(users::followers))
        .route("/users/follow/{id}", post(users::follow))
        .route("/users/stop-following/{id}", post(users::stop_following))
        .route("/messages/new", post(messages::add_message))
        .route("/messages/{id}/delete", post(messages::delete_message))
        .route("/messages/{id}/like", post(messages::toggle_like))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
