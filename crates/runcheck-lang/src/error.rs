use std::path::PathBuf;

use thiserror::Error;

use crate::language::Language;

#[derive(Debug, Error)]
pub enum LangError {
    #[error("unsupported file extension: .{0}")]
    UnknownExtension(String),

    #[error("cannot detect language of {0}: no file extension")]
    MissingExtension(PathBuf),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("invalid source path: {0}")]
    InvalidSource(PathBuf),

    #[error("build output {} would overwrite the source file", .0.display())]
    ArtifactIsSource(PathBuf),

    #[error("no {role} configured for {language}")]
    MissingProgram { language: Language, role: &'static str },
}

pub type LangResult<T> = Result<T, LangError>;
