//! Presentation of a comparison.
//!
//! A [`Renderer`] receives the structured [`LineDiff`] and decides how it
//! looks. The terminal renderers write to any `io::Write`; colors are
//! applied after padding so escape sequences never shift column alignment.

use std::io::Write;

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::compare::{report, DiffRow, LineDiff, Verdict};
use crate::error::DiffResult;
use crate::text::{pad, truncate, MIN_COLUMN_WIDTH};

/// Sink for comparison results.
pub trait Renderer {
    /// Present the rows of a mismatch.
    fn render_diff(&mut self, diff: &LineDiff) -> DiffResult<()>;

    /// Present a match. Nothing is written by default.
    fn render_match(&mut self) -> DiffResult<()> {
        Ok(())
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render_diff(&mut self, diff: &LineDiff) -> DiffResult<()> {
        (**self).render_diff(diff)
    }

    fn render_match(&mut self) -> DiffResult<()> {
        (**self).render_match()
    }
}

/// Layout used for human-readable output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStyle {
    /// `- expected` / `+ actual` pairs for differing rows only.
    #[default]
    Unified,
    /// Side-by-side box table with every row.
    Table,
    /// Machine-readable JSON document.
    Json,
}

/// Presentation settings for a [`Comparator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompareConfig {
    pub style: DiffStyle,
    /// Width of each table column, clamped to [`MIN_COLUMN_WIDTH`].
    pub column_width: usize,
    pub color: bool,
    pub expected_label: String,
    pub actual_label: String,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            style: DiffStyle::Unified,
            column_width: 40,
            color: true,
            expected_label: "expected_output".into(),
            actual_label: "actual_output".into(),
        }
    }
}

/// Compares outputs and reports them with the configured renderer.
#[derive(Clone, Debug, Default)]
pub struct Comparator {
    config: CompareConfig,
}

impl Comparator {
    pub fn new(config: CompareConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Build the renderer selected by the configured style.
    pub fn renderer<'a, W: Write + 'a>(&self, sink: W) -> Box<dyn Renderer + 'a> {
        let c = &self.config;
        match c.style {
            DiffStyle::Unified => Box::new(
                UnifiedRenderer::new(sink, &c.expected_label, &c.actual_label).with_color(c.color),
            ),
            DiffStyle::Table => {
                Box::new(TableRenderer::new(sink, c.column_width).with_color(c.color))
            }
            DiffStyle::Json => {
                Box::new(JsonRenderer::new(sink, &c.expected_label, &c.actual_label))
            }
        }
    }

    /// Compare two blobs and write the configured rendering to `sink`.
    pub fn report<W: Write>(&self, expected: &[u8], actual: &[u8], sink: W) -> DiffResult<Verdict> {
        let mut renderer = self.renderer(sink);
        report(expected, actual, &mut renderer)
    }
}

/// Unified-style renderer: only differing rows, as `-`/`+` pairs.
pub struct UnifiedRenderer<W> {
    sink: W,
    expected_label: String,
    actual_label: String,
    color: bool,
}

impl<W: Write> UnifiedRenderer<W> {
    pub fn new(sink: W, expected_label: &str, actual_label: &str) -> Self {
        Self {
            sink,
            expected_label: expected_label.to_string(),
            actual_label: actual_label.to_string(),
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> Renderer for UnifiedRenderer<W> {
    fn render_diff(&mut self, diff: &LineDiff) -> DiffResult<()> {
        let header_old = format!("--- {}", self.expected_label);
        let header_new = format!("+++ {}", self.actual_label);
        if self.color {
            writeln!(self.sink, "{}", header_old.bold())?;
            writeln!(self.sink, "{}", header_new.bold())?;
        } else {
            writeln!(self.sink, "{header_old}")?;
            writeln!(self.sink, "{header_new}")?;
        }

        for row in diff.differing_rows() {
            let removed = format!("- {}", row.expected);
            let added = format!("+ {}", row.actual);
            if self.color {
                writeln!(self.sink, "{}", removed.red())?;
                writeln!(self.sink, "{}", added.green())?;
            } else {
                writeln!(self.sink, "{removed}")?;
                writeln!(self.sink, "{added}")?;
            }
        }
        self.sink.flush()?;
        Ok(())
    }
}

/// Table-style renderer: a fixed-width, two-column box with every row.
pub struct TableRenderer<W> {
    sink: W,
    width: usize,
    color: bool,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(sink: W, column_width: usize) -> Self {
        Self {
            sink,
            width: column_width.max(MIN_COLUMN_WIDTH),
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Effective column width after clamping.
    pub fn column_width(&self) -> usize {
        self.width
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn cell(&self, line: &str) -> String {
        let line = line.replace('\t', "    ");
        pad(&truncate(&line, self.width), self.width)
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        let bar = "─".repeat(self.width + 2);
        format!("{left}{bar}{mid}{bar}{right}")
    }

    fn write_row(&mut self, row: &DiffRow) -> DiffResult<()> {
        let left = self.cell(&row.expected);
        let right = self.cell(&row.actual);
        if row.differing && self.color {
            writeln!(self.sink, "│ {} │ {} │", left.red(), right.green())?;
        } else {
            writeln!(self.sink, "│ {left} │ {right} │")?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TableRenderer<W> {
    fn render_diff(&mut self, diff: &LineDiff) -> DiffResult<()> {
        let top = self.border('┌', '┬', '┐');
        let sep = self.border('├', '┼', '┤');
        let bottom = self.border('└', '┴', '┘');
        let expected = self.cell("Expected (-)");
        let actual = self.cell("Actual (+)");

        writeln!(self.sink, "{top}")?;
        if self.color {
            writeln!(self.sink, "│ {} │ {} │", expected.bold(), actual.bold())?;
        } else {
            writeln!(self.sink, "│ {expected} │ {actual} │")?;
        }
        writeln!(self.sink, "{sep}")?;
        for row in diff.rows() {
            self.write_row(row)?;
        }
        writeln!(self.sink, "{bottom}")?;
        self.sink.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    verdict: Verdict,
    expected: &'a str,
    actual: &'a str,
    differing: usize,
    rows: &'a [DiffRow],
}

/// JSON renderer: one document per comparison, written for matches too.
pub struct JsonRenderer<W> {
    sink: W,
    expected_label: String,
    actual_label: String,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(sink: W, expected_label: &str, actual_label: &str) -> Self {
        Self {
            sink,
            expected_label: expected_label.to_string(),
            actual_label: actual_label.to_string(),
        }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn write(&mut self, verdict: Verdict, diff: &LineDiff) -> DiffResult<()> {
        let doc = JsonReport {
            verdict,
            expected: &self.expected_label,
            actual: &self.actual_label,
            differing: diff.differing_count(),
            rows: diff.rows(),
        };
        serde_json::to_writer_pretty(&mut self.sink, &doc)?;
        writeln!(self.sink)?;
        self.sink.flush()?;
        Ok(())
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render_diff(&mut self, diff: &LineDiff) -> DiffResult<()> {
        self.write(Verdict::Mismatch, diff)
    }

    fn render_match(&mut self) -> DiffResult<()> {
        self.write(Verdict::Match, &LineDiff::default())
    }
}

/// Renderer that keeps the structured rows instead of drawing them.
#[derive(Clone, Debug, Default)]
pub struct CaptureRenderer {
    pub matched: bool,
    pub rows: Vec<DiffRow>,
}

impl CaptureRenderer {
    pub fn differing(&self) -> impl Iterator<Item = &DiffRow> {
        self.rows.iter().filter(|r| r.differing)
    }
}

impl Renderer for CaptureRenderer {
    fn render_diff(&mut self, diff: &LineDiff) -> DiffResult<()> {
        self.matched = false;
        self.rows = diff.rows().to_vec();
        Ok(())
    }

    fn render_match(&mut self) -> DiffResult<()> {
        self.matched = true;
        self.rows.clear();
        Ok(())
    }
}
