/// Database row types — these map directly to SQLite rows.
/// The `id` only exists once the row has been persisted; a failed
/// signup never hands one out.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: i64,
    pub text: String,
    pub user_id: i64,
    pub created_at: String,
}
