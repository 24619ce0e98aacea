use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rusqlite::{Connection, OptionalExtension, params};

use crate::Database;
use crate::error::{SignupError, StoreError};
use crate::models::UserRow;

/// Outcome of a credential check. Both failure variants collapse to
/// `None` through [`AuthOutcome::user`], so callers that only care
/// about "did it succeed" cannot tell an unknown username from a bad
/// password.
#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(UserRow),
    UnknownUser,
    WrongPassword,
}

impl AuthOutcome {
    pub fn user(self) -> Option<UserRow> {
        match self {
            AuthOutcome::Authenticated(user) => Some(user),
            AuthOutcome::UnknownUser | AuthOutcome::WrongPassword => None,
        }
    }
}

impl Database {
    /// Hash the password and insert the user inside a transaction.
    /// A duplicate username or email trips the UNIQUE constraint and
    /// rolls the whole insert back; no id is ever assigned.
    pub fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
        image_url: Option<&str>,
    ) -> Result<UserRow, SignupError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| SignupError::Store(StoreError::PasswordHash(e.to_string())))?
            .to_string();

        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            let inserted = tx.execute(
                "INSERT INTO users (username, email, password, image_url) VALUES (?1, ?2, ?3, ?4)",
                params![username, email, password_hash, image_url],
            );

            match inserted {
                Ok(_) => {
                    let id = tx.last_insert_rowid();
                    tx.commit()?;
                    let row = query_user_by_id(conn, id)?.ok_or(StoreError::NotFound)?;
                    Ok(Ok(row))
                }
                // Dropping the transaction rolls it back.
                Err(e) => match duplicate_field(&e) {
                    Some(dup) => Ok(Err(dup)),
                    None => Err(e.into()),
                },
            }
        })?
    }

    /// Exact-username lookup followed by an argon2 verify. Failures are
    /// values, not errors: the caller sees [`AuthOutcome`].
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AuthOutcome, StoreError> {
        let Some(user) = self.get_user_by_username(username)? else {
            return Ok(AuthOutcome::UnknownUser);
        };

        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|e| StoreError::PasswordHash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(AuthOutcome::Authenticated(user)),
            Err(argon2::password_hash::Error::Password) => Ok(AuthOutcome::WrongPassword),
            Err(e) => Err(StoreError::PasswordHash(e.to_string())),
        }
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, username, email, password, image_url, created_at
                     FROM users WHERE username = ?1",
                    [username],
                    user_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Follows edges --

    /// Re-following is a no-op; the pair is unique by primary key.
    pub fn follow(&self, follower_id: i64, followed_id: i64) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO follows (follower_id, followed_id) VALUES (?1, ?2)",
                [follower_id, followed_id],
            )?;
            Ok(())
        })
    }

    pub fn unfollow(&self, follower_id: i64, followed_id: i64) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
                [follower_id, followed_id],
            )?;
            Ok(())
        })
    }

    pub fn is_following(&self, follower_id: i64, followed_id: i64) -> Result<bool, StoreError> {
        self.with_conn(|conn| edge_exists(conn, follower_id, followed_id))
    }

    pub fn is_followed_by(&self, user_id: i64, other_id: i64) -> Result<bool, StoreError> {
        self.with_conn(|conn| edge_exists(conn, other_id, user_id))
    }

    /// Users this user follows, for the following page.
    pub fn following(&self, user_id: i64) -> Result<Vec<UserRow>, StoreError> {
        self.with_conn(|conn| {
            query_users(
                conn,
                "SELECT u.id, u.username, u.email, u.password, u.image_url, u.created_at
                 FROM users u JOIN follows f ON f.followed_id = u.id
                 WHERE f.follower_id = ?1
                 ORDER BY u.username",
                user_id,
            )
        })
    }

    /// Users following this user.
    pub fn followers(&self, user_id: i64) -> Result<Vec<UserRow>, StoreError> {
        self.with_conn(|conn| {
            query_users(
                conn,
                "SELECT u.id, u.username, u.email, u.password, u.image_url, u.created_at
                 FROM users u JOIN follows f ON f.follower_id = u.id
                 WHERE f.followed_id = ?1
                 ORDER BY u.username",
                user_id,
            )
        })
    }
}

fn duplicate_field(e: &rusqlite::Error) -> Option<SignupError> {
    if let rusqlite::Error::SqliteFailure(err, Some(msg)) = e {
        if err.code == rusqlite::ErrorCode::ConstraintViolation {
            if msg.contains("users.username") {
                return Some(SignupError::UsernameTaken);
            }
            if msg.contains("users.email") {
                return Some(SignupError::EmailTaken);
            }
        }
    }
    None
}

fn edge_exists(conn: &Connection, follower_id: i64, followed_id: i64) -> Result<bool, StoreError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
            [follower_id, followed_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>, StoreError> {
    let row = conn
        .query_row(
            "SELECT id, username, email, password, image_url, created_at
             FROM users WHERE id = ?1",
            [id],
            user_from_row,
        )
        .optional()?;
    Ok(row)
}

fn query_users(conn: &Connection, sql: &str, user_id: i64) -> Result<Vec<UserRow>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([user_id], user_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub(crate) fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        image_url: row.get(4)?,
        created_at: row.get(5)?,
    })
}
