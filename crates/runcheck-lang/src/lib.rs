//! Language table for runcheck.
//!
//! Maps a source file to a [`Language`] by extension and turns that language
//! plus a [`Toolchain`] into the concrete compile and run invocations of a
//! [`BuildPlan`]. Nothing here spawns processes.

pub mod error;
pub mod language;
pub mod plan;

pub use error::{LangError, LangResult};
pub use language::Language;
pub use plan::{same_file, BuildPlan, CommandSpec, Toolchain};
