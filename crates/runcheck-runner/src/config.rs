use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use runcheck_diff::{CompareConfig, DiffStyle};
use runcheck_lang::{Language, Toolchain};
use serde::{Deserialize, Serialize};

use crate::error::{RunnerError, RunnerResult};

/// Harness settings. Loaded from TOML, then overridden by command-line flags.
///
/// ```toml
/// build_dir = "target/runcheck"
/// keep_artifacts = false
/// style = "table"
/// column_width = 32
///
/// [toolchain.cpp]
/// compiler = "clang++"
/// flags = ["-O2", "-std=c++17"]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Directory that receives compiled binaries and class files.
    pub build_dir: PathBuf,
    pub keep_artifacts: bool,
    /// Treat a mismatch as a failed run.
    pub fail_on_diff: bool,
    pub style: DiffStyle,
    pub column_width: usize,
    pub color: bool,
    /// Per-language overrides, keyed by language name or alias.
    pub toolchain: BTreeMap<String, ToolchainOverride>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from("."),
            keep_artifacts: false,
            fail_on_diff: false,
            style: DiffStyle::Unified,
            column_width: 40,
            color: true,
            toolchain: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainOverride {
    pub compiler: Option<String>,
    pub runtime: Option<String>,
    pub flags: Option<Vec<String>>,
}

impl HarnessConfig {
    pub fn from_toml_str(text: &str) -> RunnerResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| RunnerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> RunnerResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| {
                RunnerError::io(format!("cannot read config file {}", path.display()), e)
            })?;
        Self::from_toml_str(&text)
    }

    /// Reject toolchain keys that do not name a language.
    pub fn validate(&self) -> RunnerResult<()> {
        for key in self.toolchain.keys() {
            key.parse::<Language>()
                .map_err(|_| {
                    RunnerError::Config(format!("unknown language in [toolchain.{key}]"))
                })?;
        }
        Ok(())
    }

    /// The default toolchain for `language` with any configured overrides applied.
    pub fn toolchain_for(&self, language: Language) -> Toolchain {
        let mut toolchain = Toolchain::default_for(language);
        let overrides = self
            .toolchain
            .iter()
            .filter(|(key, _)| key.parse::<Language>().ok() == Some(language))
            .map(|(_, o)| o);

        for o in overrides {
            if let Some(compiler) = &o.compiler {
                toolchain.compiler = Some(compiler.clone());
            }
            if let Some(runtime) = &o.runtime {
                toolchain.runtime = Some(runtime.clone());
            }
            if let Some(flags) = &o.flags {
                toolchain.compile_flags = flags.clone();
            }
        }
        toolchain
    }

    pub fn compare_config(&self, expected_label: &str, actual_label: &str) -> CompareConfig {
        CompareConfig {
            style: self.style,
            column_width: self.column_width,
            color: self.color,
            expected_label: expected_label.to_string(),
            actual_label: actual_label.to_string(),
        }
    }
}
