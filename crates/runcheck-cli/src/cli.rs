use std::path::PathBuf;

use clap::Parser;
use runcheck_diff::DiffStyle;
use runcheck_lang::Language;
use runcheck_runner::{HarnessConfig, Job, RunnerResult};

#[derive(Parser, Debug)]
#[command(
    name = "runcheck",
    about = "Compile and run one solution, then diff its output against the expected output",
    version,
)]
pub struct Cli {
    /// Solution source file; the language is detected from its extension
    pub source: PathBuf,
    /// File fed to the program on stdin
    pub input: PathBuf,
    /// File that receives the program's stdout
    pub output: PathBuf,
    /// Expected output to compare against
    pub expected: PathBuf,

    /// Language to use instead of the detected one
    #[arg(short, long)]
    pub lang: Option<Language>,

    #[arg(long)]
    pub style: Option<StyleArg>,

    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Column width of the table style
    #[arg(short, long)]
    pub width: Option<usize>,

    #[arg(long)]
    pub no_color: bool,

    /// Leave compiled binaries and class files in place
    #[arg(long)]
    pub keep_artifacts: bool,

    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Exit with status 1 when the output differs
    #[arg(long)]
    pub fail_on_diff: bool,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StyleArg {
    Unified,
    Table,
}

impl From<StyleArg> for DiffStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Unified => DiffStyle::Unified,
            StyleArg::Table => DiffStyle::Table,
        }
    }
}

impl Cli {
    /// Configuration file (or defaults) with command-line flags applied on top.
    pub fn harness_config(&self) -> RunnerResult<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::load(path)?,
            None => HarnessConfig::default(),
        };

        if let Some(style) = self.style {
            config.style = style.into();
        }
        if let Some(width) = self.width {
            config.column_width = width;
        }
        if let Some(dir) = &self.build_dir {
            config.build_dir = dir.clone();
        }
        config.keep_artifacts |= self.keep_artifacts;
        config.fail_on_diff |= self.fail_on_diff;
        if self.no_color {
            config.color = false;
        }
        if self.format == OutputFormat::Json {
            config.style = DiffStyle::Json;
            config.color = false;
        }
        Ok(config)
    }

    pub fn job(&self) -> Job {
        let job = Job::new(&self.source, &self.input, &self.output, &self.expected);
        match self.lang {
            Some(lang) => job.with_language(lang),
            None => job,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILES: [&str; 5] = ["runcheck", "sol.cpp", "in.txt", "out.txt", "exp.txt"];

    fn parse(extra: &[&str]) -> Cli {
        Cli::try_parse_from(FILES.iter().chain(extra)).unwrap()
    }

    #[test]
    fn parse_positionals() {
        let cli = parse(&[]);
        assert_eq!(cli.source, PathBuf::from("sol.cpp"));
        assert_eq!(cli.input, PathBuf::from("in.txt"));
        assert_eq!(cli.output, PathBuf::from("out.txt"));
        assert_eq!(cli.expected, PathBuf::from("exp.txt"));
        assert!(cli.lang.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn missing_positional_is_an_error() {
        assert!(Cli::try_parse_from(["runcheck", "sol.cpp", "in.txt"]).is_err());
    }

    #[test]
    fn parse_language_alias() {
        let cli = parse(&["--lang", "c++"]);
        assert_eq!(cli.lang, Some(Language::Cpp));
        let cli = parse(&["-l", "py"]);
        assert_eq!(cli.lang, Some(Language::Python));
    }

    #[test]
    fn unknown_language_is_rejected() {
        let args = FILES.iter().chain(&["--lang", "cobol"]);
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn parse_verbose() {
        assert!(parse(&["-v"]).verbose);
    }

    #[test]
    fn defaults_without_flags() {
        assert_eq!(parse(&[]).harness_config().unwrap(), HarnessConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "--style",
            "table",
            "-w",
            "20",
            "--no-color",
            "--keep-artifacts",
            "--build-dir",
            "out",
            "--fail-on-diff",
        ]);
        let config = cli.harness_config().unwrap();
        assert_eq!(config.style, DiffStyle::Table);
        assert_eq!(config.column_width, 20);
        assert!(!config.color);
        assert!(config.keep_artifacts);
        assert!(config.fail_on_diff);
        assert_eq!(config.build_dir, PathBuf::from("out"));
    }

    #[test]
    fn json_format_selects_json_style() {
        let config = parse(&["--format", "json", "--style", "table"]).harness_config().unwrap();
        assert_eq!(config.style, DiffStyle::Json);
        assert!(!config.color);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runcheck.toml");
        let toml = "style = \"table\"\ncolumn_width = 30\nkeep_artifacts = true\n";
        std::fs::write(&path, toml).unwrap();

        let cli = parse(&["-c", path.to_str().unwrap(), "-w", "12"]);
        let config = cli.harness_config().unwrap();
        assert_eq!(config.style, DiffStyle::Table);
        assert_eq!(config.column_width, 12);
        assert!(config.keep_artifacts);
    }

    #[test]
    fn job_carries_language_override() {
        let job = parse(&["--lang", "java"]).job();
        assert_eq!(job.language, Some(Language::Java));
        assert_eq!(job.source, PathBuf::from("sol.cpp"));
    }
}
