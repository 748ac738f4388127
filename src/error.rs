//! Error taxonomy for the shell and its applications.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a whole command line.
///
/// Every variant is recovered at the command-line boundary: the front end
/// reports the message and either continues (interactive) or exits (`-c`).
#[derive(Debug, Error)]
pub enum ShellError {
    /// The grammar cannot derive the input, or a rewrite rule is violated.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A runtime rule is violated (e.g. two output redirections on one call).
    #[error("execution error: {0}")]
    Execution(String),

    /// A builtin failed while running.
    #[error("execution error: {app}: {source}")]
    Application {
        app: String,
        #[source]
        source: AppError,
    },

    /// Writing an output redirection target failed.
    #[error("execution error: cannot write {}: {source}", path.display())]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The command line names no application, or an unknown one.
    #[error("dispatch error: {0}")]
    Dispatch(String),
}

impl ShellError {
    pub(crate) fn syntax(msg: impl Into<String>) -> Self {
        ShellError::Syntax(msg.into())
    }

    pub(crate) fn execution(msg: impl Into<String>) -> Self {
        ShellError::Execution(msg.into())
    }

    pub(crate) fn dispatch(msg: impl Into<String>) -> Self {
        ShellError::Dispatch(msg.into())
    }

    /// True for every runtime failure (redirection conflicts, builtin errors).
    pub fn is_execution(&self) -> bool {
        matches!(
            self,
            ShellError::Execution(_) | ShellError::Application { .. } | ShellError::Redirect { .. }
        )
    }
}

/// Failure raised by a single application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid {0} arguments")]
    InvalidArguments(&'static str),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid pattern: {0}")]
    Pattern(String),
}

impl AppError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<regex::Error> for AppError {
    fn from(e: regex::Error) -> Self {
        AppError::Pattern(e.to_string())
    }
}

impl From<glob::PatternError> for AppError {
    fn from(e: glob::PatternError) -> Self {
        AppError::Pattern(e.to_string())
    }
}
