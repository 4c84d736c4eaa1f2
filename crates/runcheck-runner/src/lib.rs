//! Build, execute, and compare harness for runcheck.
//!
//! A [`Job`] names a source file, an input file, an output file to capture
//! into, and an expected-output file. The [`Harness`] compiles the source if
//! its language needs it, runs it with the input on stdin, and compares the
//! captured output with the expected output. Behavior such as artifact
//! cleanup and diff presentation comes from an explicit [`HarnessConfig`].

pub mod config;
pub mod error;
pub mod harness;

pub use config::{HarnessConfig, ToolchainOverride};
pub use error::{RunnerError, RunnerResult};
pub use harness::{Execution, Harness, Job, Stage};
