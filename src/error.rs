use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found")]
    NotFound,

    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    #[error("invalid credentials")]
    AuthenticationFailed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("bad request: {0}")]
    BadRequest(String),
}

pub type Result<T> = std::result::Result<T, Error>;
