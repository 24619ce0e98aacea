use serde::{Deserialize, Serialize};

/// Session cookie slot holding the current user's id. The only
/// authentication signal in the system.
pub const CURR_USER_KEY: &str = "curr_user";

/// The resolved session identity, attached to authorized requests as
/// an extension by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}
