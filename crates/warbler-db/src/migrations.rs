use rusqlite::Connection;
use tracing::info;

use crate::error::StoreError;

pub fn run(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            image_url   TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS messages (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            text        TEXT NOT NULL,
            user_id     INTEGER NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_messages_user
            ON messages(user_id, created_at);

        CREATE TABLE IF NOT EXISTS follows (
            follower_id INTEGER NOT NULL REFERENCES users(id),
            followed_id INTEGER NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (follower_id, followed_id)
        );

        CREATE INDEX IF NOT EXISTS idx_follows_followed
            ON follows(followed_id);

        CREATE TABLE IF NOT EXISTS likes (
            user_id     INTEGER NOT NULL REFERENCES users(id),
            message_id  INTEGER NOT NULL REFERENCES messages(id),
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (user_id, message_id)
        );

        CREATE INDEX IF NOT EXISTS idx_likes_message
            ON likes(message_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
