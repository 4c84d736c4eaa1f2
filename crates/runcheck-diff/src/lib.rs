//! Output comparator for runcheck.
//!
//! Decides whether a program's captured output matches the expected output
//! and, when it does not, reports the differing lines.
//!
//! # Key Types
//!
//! - [`compare`] / [`ComparisonResult`] -- trimmed whole-blob verdict plus index-aligned rows
//! - [`LineDiff`] / [`DiffRow`] -- one row per line index, tagged equal or differing
//! - [`Renderer`] -- presentation seam; [`UnifiedRenderer`], [`TableRenderer`],
//!   [`JsonRenderer`] write to any `io::Write`, [`CaptureRenderer`] records rows
//! - [`Comparator`] / [`CompareConfig`] -- picks a renderer from configuration
//!
//! # Rules
//!
//! 1. Leading and trailing whitespace of each whole blob is ignored for the verdict.
//! 2. Internal whitespace and blank lines are significant.
//! 3. Rows are aligned by index; there is no reordering tolerance.
//! 4. Bytes are never validated as UTF-8; rendering is lossy.

pub mod compare;
pub mod error;
pub mod render;
pub mod text;

pub use compare::{compare, diff_lines, report, ComparisonResult, DiffRow, LineDiff, Verdict};
pub use error::{DiffError, DiffResult};
pub use render::{
    CaptureRenderer, Comparator, CompareConfig, DiffStyle, JsonRenderer, Renderer, TableRenderer,
    UnifiedRenderer,
};
pub use text::{pad, split_lines, truncate, ELLIPSIS, MIN_COLUMN_WIDTH};
