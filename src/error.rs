use thiserror::Error;

pub type Result<T> = std::result::Result<T, BackdateError>;

#[derive(Error, Debug)]
pub enum BackdateError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Git error: {0}")]
    Git(#[from] GitError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failures of a single `git` invocation.
#[derive(Error, Debug)]
pub enum GitError {
    /// The git binary could not be found or spawned.
    #[error("failed to execute git: {0}")]
    Spawn(#[source] std::io::Error),

    /// The git command exited with a non-zero status.
    #[error("git {command} failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}
