pub mod api;
pub mod models;

pub use models::{CURR_USER_KEY, CurrentUser};
