use thiserror::Error;

/// Closed set of failure conditions for the attempt lifecycle. Everything but
/// `Persistence` is an expected, recoverable condition that callers turn into
/// user-facing messaging; `Persistence` is retryable and leaves the open
/// session intact.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("quiz or attempt not found")]
    NotFound,

    #[error("an attempt for this quiz is already in progress")]
    AlreadyOpen,

    #[error("attempt limit of {limit} reached for this quiz")]
    MaxAttemptsExceeded { limit: i32 },

    #[error("no attempt in progress for this quiz")]
    NoActiveSession,

    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<sqlx::Error> for AttemptError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AttemptError::NotFound,
            other => AttemptError::Persistence(other.to_string()),
        }
    }
}
