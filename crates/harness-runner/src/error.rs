use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("malformed option '{token}': expected exactly one '=' with a non-empty key")]
    MalformedOption { token: String },

    #[error("missing required argument <{name}>")]
    MissingArgument { name: &'static str },

    #[error("invalid repeat '{value}': expected a positive integer")]
    InvalidRepeat { value: String },

    #[error("failed to launch '{program}': {source}")]
    LaunchFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read scripts directory {}: {source}", .path.display())]
    ScriptsDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl LaunchError {
    /// True for errors caused by the command line itself. These are raised
    /// before any child process is started.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            LaunchError::MalformedOption { .. }
                | LaunchError::MissingArgument { .. }
                | LaunchError::InvalidRepeat { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LaunchError>;
