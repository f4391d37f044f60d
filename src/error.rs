use std::io;

use thiserror::Error;

/// Errors reported by the shell while processing a single command line.
///
/// None of these are fatal: the REPL prints them and reprompts.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("{0}: missing redirection target")]
    MissingRedirectTarget(String),

    #[error("{path}: {source}")]
    OpenRedirect { path: String, source: io::Error },

    #[error("cd: {0}: No such file or directory")]
    NoSuchDirectory(String),

    #[error("cd: HOME not set")]
    HomeNotSet,

    #[error("{name}: {source}")]
    Spawn { name: String, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type ShellResult<T> = Result<T, ShellError>;
