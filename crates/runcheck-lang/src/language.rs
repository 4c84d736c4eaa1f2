use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LangError, LangResult};

/// Languages runcheck knows how to build and run.
/// Serialized in `lowercase`; common aliases are accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[serde(alias = "golang")]
    Go,
    C,
    #[serde(alias = "c++", alias = "cc")]
    Cpp,
    #[serde(alias = "rs")]
    Rust,
    Java,
    #[serde(alias = "py", alias = "python3")]
    Python,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::Go,
        Language::C,
        Language::Cpp,
        Language::Rust,
        Language::Java,
        Language::Python,
    ];

    /// Map a file extension (without the dot, any case) to a language.
    pub fn from_extension(ext: &str) -> LangResult<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "go" => Ok(Language::Go),
            "c" => Ok(Language::C),
            "cpp" | "cc" | "cxx" | "c++" => Ok(Language::Cpp),
            "rs" => Ok(Language::Rust),
            "java" => Ok(Language::Java),
            "py" => Ok(Language::Python),
            _ => Err(LangError::UnknownExtension(ext.to_string())),
        }
    }

    /// Detect the language of a source file from its extension.
    pub fn detect(path: &Path) -> LangResult<Self> {
        let ext = path
            .extension()
            .ok_or_else(|| LangError::MissingExtension(path.to_path_buf()))?;
        Self::from_extension(&ext.to_string_lossy())
    }

    /// Canonical lowercase name, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Rust => "rust",
            Language::Java => "java",
            Language::Python => "python",
        }
    }

    /// Human-facing name for progress messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Go => "Go",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::Rust => "Rust",
            Language::Java => "Java",
            Language::Python => "Python",
        }
    }

    /// Whether a build step runs before execution.
    pub fn is_compiled(self) -> bool {
        !matches!(self, Language::Python)
    }
}

impl FromStr for Language {
    type Err = LangError;

    fn from_str(s: &str) -> LangResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "go" | "golang" => Ok(Language::Go),
            "c" => Ok(Language::C),
            "cpp" | "c++" | "cc" | "cxx" => Ok(Language::Cpp),
            "rust" | "rs" => Ok(Language::Rust),
            "java" => Ok(Language::Java),
            "python" | "python3" | "py" => Ok(Language::Python),
            _ => Err(LangError::UnsupportedLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
