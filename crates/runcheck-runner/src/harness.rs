//! Compile, execute, compare, and clean up for one job.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use runcheck_diff::{report, Comparator, Renderer, Verdict};
use runcheck_lang::{same_file, BuildPlan, CommandSpec, Language};
use tracing::{debug, warn};

use crate::config::HarnessConfig;
use crate::error::{RunnerError, RunnerResult};

/// One source file checked against one test case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    pub source: PathBuf,
    /// Fed to the program on stdin.
    pub input: PathBuf,
    /// Receives the program's stdout; created or truncated.
    pub output: PathBuf,
    pub expected: PathBuf,
    /// Overrides extension-based detection.
    pub language: Option<Language>,
}

impl Job {
    pub fn new(
        source: impl Into<PathBuf>,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        expected: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            input: input.into(),
            output: output.into(),
            expected: expected.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Check that the source, input, and expected files exist, in that order.
    pub fn validate(&self) -> RunnerResult<()> {
        for path in [&self.source, &self.input, &self.expected] {
            if !path.exists() {
                return Err(RunnerError::MissingFile(path.clone()));
            }
        }
        Ok(())
    }

    pub fn language(&self) -> RunnerResult<Language> {
        match self.language {
            Some(language) => Ok(language),
            None => Ok(Language::detect(&self.source)?),
        }
    }
}

/// Progress notifications emitted by [`Harness::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Compiling(Language),
    /// The language runs from source; there is no build step.
    Interpreted(Language),
    Executing,
    Comparing,
}

/// A finished, successful program run.
#[derive(Clone, Copy, Debug)]
pub struct Execution {
    pub status: ExitStatus,
    pub elapsed: Duration,
}

pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Resolve the language and toolchain of `job` into a build plan.
    pub fn prepare(&self, job: &Job) -> RunnerResult<BuildPlan> {
        let language = job.language()?;
        let toolchain = self.config.toolchain_for(language);
        let plan = BuildPlan::new(language, &job.source, &self.config.build_dir, toolchain)?;
        debug!(language = language.name(), source = %job.source.display(), "prepared build plan");
        Ok(plan)
    }

    /// Run the build step, if any. Compiler output goes straight to the terminal.
    pub fn compile(&self, plan: &BuildPlan) -> RunnerResult<()> {
        let Some(spec) = plan.compile_command() else {
            return Ok(());
        };

        fs::create_dir_all(plan.build_dir()).map_err(|e| {
            let context = format!("cannot create build directory {}", plan.build_dir().display());
            RunnerError::io(context, e)
        })?;

        debug!(command = %spec, "compiling");
        let started = Instant::now();
        let status = spec
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| spawn_error(&spec, e))?;
        debug!(elapsed = ?started.elapsed(), %status, "compiler exited");

        if !status.success() {
            return Err(RunnerError::CompilationFailed(status));
        }
        Ok(())
    }

    /// Run the program with the job's input on stdin and stdout captured to its output file.
    pub fn execute(&self, plan: &BuildPlan, job: &Job) -> RunnerResult<Execution> {
        let input = File::open(&job.input).map_err(|e| {
            RunnerError::io(format!("cannot open input file {}", job.input.display()), e)
        })?;
        let output = File::create(&job.output).map_err(|e| {
            RunnerError::io(format!("cannot create output file {}", job.output.display()), e)
        })?;

        let spec = plan.run_command();
        debug!(command = %spec, "executing");
        let started = Instant::now();
        let status = spec
            .to_command()
            .stdin(Stdio::from(input))
            .stdout(Stdio::from(output))
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| spawn_error(&spec, e))?;
        let elapsed = started.elapsed();
        debug!(?elapsed, %status, "program exited");

        if !status.success() {
            return Err(RunnerError::ExecutionFailed(status));
        }
        Ok(Execution { status, elapsed })
    }

    /// Comparator labelled with the job's file names and configured presentation.
    pub fn comparator(&self, job: &Job) -> Comparator {
        let expected = job.expected.display().to_string();
        let actual = job.output.display().to_string();
        Comparator::new(self.config.compare_config(&expected, &actual))
    }

    /// Read the captured and expected outputs and report them through `renderer`.
    pub fn compare<R>(&self, job: &Job, renderer: &mut R) -> RunnerResult<Verdict>
    where
        R: Renderer + ?Sized,
    {
        let actual = read(&job.output, "cannot read actual output")?;
        let expected = read(&job.expected, "cannot read expected output")?;
        Ok(report(&expected, &actual, renderer)?)
    }

    /// Remove build artifacts unless configured to keep them. Returns how many were removed.
    pub fn cleanup(&self, plan: &BuildPlan) -> usize {
        if self.config.keep_artifacts {
            debug!("keeping build artifacts");
            return 0;
        }

        let mut removed = 0;
        for path in plan.artifacts() {
            if same_file(&path, plan.source()) {
                warn!(path = %path.display(), "artifact resolves to the source file, not removing");
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    removed += 1;
                    debug!(path = %path.display(), "removed artifact");
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove build artifact")
                }
            }
        }
        removed
    }

    /// Validate, compile, execute, and compare. Artifacts are cleaned up
    /// whether or not the later steps succeed.
    pub fn run<R, F>(&self, job: &Job, renderer: &mut R, mut on_stage: F) -> RunnerResult<Verdict>
    where
        R: Renderer + ?Sized,
        F: FnMut(Stage),
    {
        job.validate()?;
        let plan = self.prepare(job)?;
        let language = plan.language();

        if language.is_compiled() {
            on_stage(Stage::Compiling(language));
        } else {
            on_stage(Stage::Interpreted(language));
        }

        let result = self.compile(&plan).and_then(|()| {
            on_stage(Stage::Executing);
            let execution = self.execute(&plan, job)?;
            debug!(elapsed = ?execution.elapsed, "run finished");
            on_stage(Stage::Comparing);
            self.compare(job, renderer)
        });

        self.cleanup(&plan);
        result
    }
}

fn spawn_error(spec: &CommandSpec, source: io::Error) -> RunnerError {
    RunnerError::Spawn {
        program: spec.program.to_string_lossy().into_owned(),
        source,
    }
}

fn read(path: &Path, context: &str) -> RunnerResult<Vec<u8>> {
    fs::read(path).map_err(|e| RunnerError::io(format!("{context} {}", path.display()), e))
}
