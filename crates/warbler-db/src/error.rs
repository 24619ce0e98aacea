use thiserror::Error;

/// Failures from the persistence layer itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("message text must not be empty")]
    EmptyText,

    #[error("record not found")]
    NotFound,

    #[error("password hash error: {0}")]
    PasswordHash(String),

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Signup validation failures. Uniqueness is detected at the SQLite
/// constraint, so a rejected signup never persists a row.
#[derive(Debug, Error)]
pub enum SignupError {
    #[error("username already taken")]
    UsernameTaken,

    #[error("email already taken")]
    EmailTaken,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<rusqlite::Error> for SignupError {
    fn from(e: rusqlite::Error) -> Self {
        SignupError::Store(StoreError::Sqlite(e))
    }
}
