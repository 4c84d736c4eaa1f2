use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{} does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error(transparent)]
    Lang(#[from] runcheck_lang::LangError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("compilation failed: {0}")]
    CompilationFailed(ExitStatus),

    #[error("execution failed: {0}")]
    ExecutionFailed(ExitStatus),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Diff(#[from] runcheck_diff::DiffError),
}

impl RunnerError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }
}

pub type RunnerResult<T> = Result<T, RunnerError>;
