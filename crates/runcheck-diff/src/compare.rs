//! Whole-blob verdict and index-aligned line rows.

use serde::Serialize;
use tracing::debug;

use crate::error::DiffResult;
use crate::render::Renderer;
use crate::text::split_lines;

/// Outcome of comparing expected output with actual output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Match,
    Mismatch,
}

impl Verdict {
    pub fn is_match(self) -> bool {
        matches!(self, Verdict::Match)
    }
}

/// One line index of a diff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffRow {
    /// Zero-based line index.
    pub index: usize,
    /// Expected line, or empty if the expected output has fewer lines.
    pub expected: String,
    /// Actual line, or empty if the actual output has fewer lines.
    pub actual: String,
    /// Whether the two lines differ byte-for-byte.
    pub differing: bool,
}

impl DiffRow {
    pub fn is_differing(&self) -> bool {
        self.differing
    }

    /// One-based line number, for display.
    pub fn line_number(&self) -> usize {
        self.index + 1
    }
}

/// Every row of a line diff, equal rows included.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LineDiff {
    rows: Vec<DiffRow>,
}

impl LineDiff {
    pub fn rows(&self) -> &[DiffRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn differing_rows(&self) -> impl Iterator<Item = &DiffRow> {
        self.rows.iter().filter(|r| r.differing)
    }

    pub fn differing_count(&self) -> usize {
        self.differing_rows().count()
    }
}

/// Result of [`compare`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComparisonResult {
    /// The trimmed blobs are byte-identical.
    Match,
    /// The trimmed blobs differ; rows cover the untrimmed blobs.
    Diff(LineDiff),
}

impl ComparisonResult {
    pub fn is_match(&self) -> bool {
        matches!(self, ComparisonResult::Match)
    }

    pub fn verdict(&self) -> Verdict {
        match self {
            ComparisonResult::Match => Verdict::Match,
            ComparisonResult::Diff(_) => Verdict::Mismatch,
        }
    }

    pub fn diff(&self) -> Option<&LineDiff> {
        match self {
            ComparisonResult::Match => None,
            ComparisonResult::Diff(diff) => Some(diff),
        }
    }
}

/// Compare two output blobs.
///
/// Surrounding ASCII whitespace of each whole blob is ignored for the
/// verdict. On mismatch the untrimmed blobs are split into lines and paired
/// up by index.
pub fn compare(expected: &[u8], actual: &[u8]) -> ComparisonResult {
    if expected.trim_ascii() == actual.trim_ascii() {
        return ComparisonResult::Match;
    }
    ComparisonResult::Diff(diff_lines(expected, actual))
}

/// Pair the lines of two blobs by index, padding the shorter side with empty lines.
pub fn diff_lines(expected: &[u8], actual: &[u8]) -> LineDiff {
    let expected: Vec<&[u8]> = split_lines(expected).collect();
    let actual: Vec<&[u8]> = split_lines(actual).collect();
    let len = expected.len().max(actual.len());

    let rows = (0..len)
        .map(|index| {
            let e = expected.get(index).copied().unwrap_or_default();
            let a = actual.get(index).copied().unwrap_or_default();
            DiffRow {
                index,
                expected: String::from_utf8_lossy(e).into_owned(),
                actual: String::from_utf8_lossy(a).into_owned(),
                differing: e != a,
            }
        })
        .collect();

    LineDiff { rows }
}

/// Compare two blobs and hand the result to `renderer`.
pub fn report<R: Renderer + ?Sized>(
    expected: &[u8],
    actual: &[u8],
    renderer: &mut R,
) -> DiffResult<Verdict> {
    let result = compare(expected, actual);
    match &result {
        ComparisonResult::Match => renderer.render_match()?,
        ComparisonResult::Diff(diff) => {
            debug!(rows = diff.len(), differing = diff.differing_count(), "outputs differ");
            renderer.render_diff(diff)?;
        }
    }
    Ok(result.verdict())
}
