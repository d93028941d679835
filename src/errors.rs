use thiserror::Error;

/// Result type alias for rollback operations
pub type Result<T> = anyhow::Result<T>;

#[derive(Error, Debug)]
pub enum RollbackError {
    #[error("cannot find executable `{0}` on PATH")]
    ExecutableNotFound(String),

    #[error("command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("failed to launch {command}: {source}")]
    LaunchFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
