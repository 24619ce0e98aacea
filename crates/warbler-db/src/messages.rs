use rusqlite::{Connection, OptionalExtension, params};

use crate::Database;
use crate::error::StoreError;
use crate::models::{MessageRow, UserRow};
use crate::users::user_from_row;

impl Database {
    /// Persist a message owned by `author_id`. Blank text is rejected
    /// before touching the database.
    pub fn create_message(&self, text: &str, author_id: i64) -> Result<MessageRow, StoreError> {
        if text.trim().is_empty() {
            return Err(StoreError::EmptyText);
        }

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (text, user_id) VALUES (?1, ?2)",
                params![text, author_id],
            )?;
            let id = conn.last_insert_rowid();
            query_message(conn, id)?.ok_or(StoreError::NotFound)
        })
    }

    pub fn get_message(&self, id: i64) -> Result<Option<MessageRow>, StoreError> {
        self.with_conn(|conn| query_message(conn, id))
    }

    pub fn messages_for_user(&self, user_id: i64) -> Result<Vec<MessageRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, text, user_id, created_at
                 FROM messages
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;
            let rows = stmt
                .query_map([user_id], message_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Delete by id. Ownership is the caller's concern; the likes on
    /// the message go with it.
    pub fn delete_message(&self, id: i64) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM likes WHERE message_id = ?1", [id])?;
            let deleted = conn.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    // -- Likes edges --

    /// A user likes a given message at most once.
    pub fn like(&self, user_id: i64, message_id: i64) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO likes (user_id, message_id) VALUES (?1, ?2)",
                [user_id, message_id],
            )?;
            Ok(())
        })
    }

    pub fn unlike(&self, user_id: i64, message_id: i64) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM likes WHERE user_id = ?1 AND message_id = ?2",
                [user_id, message_id],
            )?;
            Ok(())
        })
    }

    /// Toggle a like: removes if present, inserts if not.
    /// Returns true when the like was added.
    pub fn toggle_like(&self, user_id: i64, message_id: i64) -> Result<bool, StoreError> {
        self.with_conn(|conn| {
            let existing: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM likes WHERE user_id = ?1 AND message_id = ?2",
                    [user_id, message_id],
                    |row| row.get(0),
                )
                .optional()?;

            if existing.is_some() {
                conn.execute(
                    "DELETE FROM likes WHERE user_id = ?1 AND message_id = ?2",
                    [user_id, message_id],
                )?;
                Ok(false)
            } else {
                conn.execute(
                    "INSERT INTO likes (user_id, message_id) VALUES (?1, ?2)",
                    [user_id, message_id],
                )?;
                Ok(true)
            }
        })
    }

    /// Who liked this message.
    pub fn user_likes(&self, message_id: i64) -> Result<Vec<UserRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT u.id, u.username, u.email, u.password, u.image_url, u.created_at
                 FROM users u JOIN likes l ON l.user_id = u.id
                 WHERE l.message_id = ?1
                 ORDER BY u.id",
            )?;
            let rows = stmt
                .query_map([message_id], user_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_message(conn: &Connection, id: i64) -> Result<Option<MessageRow>, StoreError> {
    let row = conn
        .query_row(
            "SELECT id, text, user_id, created_at FROM messages WHERE id = ?1",
            [id],
            message_from_row,
        )
        .optional()?;
    Ok(row)
}

fn message_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        text: row.get(1)?,
        user_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}
