use std::io::{self, Write};
use std::process::ExitCode;

use colored::{ColoredString, Colorize};
use runcheck_diff::{DiffResult, LineDiff, Renderer, Verdict};
use runcheck_runner::{Harness, Stage};

use crate::cli::{Cli, OutputFormat};

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.harness_config()?;
    let color = config.color;

    let job = cli.job();
    let harness = Harness::new(config);
    let comparator = harness.comparator(&job);

    let verdict = match cli.format {
        OutputFormat::Text => {
            let inner = comparator.renderer(io::stdout());
            let mut renderer = Announce::new(inner, io::stdout(), color);
            harness.run(&job, &mut renderer, |stage| println!("{}", stage_line(stage, color)))?
        }
        OutputFormat::Json => {
            let mut renderer = comparator.renderer(io::stdout());
            harness.run(&job, &mut renderer, |_| {})?
        }
    };

    if verdict == Verdict::Mismatch && harness.config().fail_on_diff {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Apply `style` only when colour output is on.
pub fn paint(text: &str, color: bool, style: fn(ColoredString) -> ColoredString) -> String {
    if color {
        style(text.normal()).to_string()
    } else {
        text.to_string()
    }
}

fn stage_line(stage: Stage, color: bool) -> String {
    match stage {
        Stage::Compiling(lang) => {
            format!("Compiling {}...", paint(lang.display_name(), color, |s| s.bold()))
        }
        Stage::Interpreted(lang) => format!(
            "{} doesn't require compilation.",
            paint(lang.display_name(), color, |s| s.bold())
        ),
        Stage::Executing => "Executing...".to_string(),
        Stage::Comparing => "Comparing outputs...".to_string(),
    }
}

/// Prints the verdict headline before handing rows to the wrapped renderer.
struct Announce<R, W> {
    inner: R,
    out: W,
    color: bool,
}

impl<R: Renderer, W: Write> Announce<R, W> {
    fn new(inner: R, out: W, color: bool) -> Self {
        Self { inner, out, color }
    }
}

impl<R: Renderer, W: Write> Renderer for Announce<R, W> {
    fn render_diff(&mut self, diff: &LineDiff) -> DiffResult<()> {
        let noun = if diff.differing_count() == 1 { "line" } else { "lines" };
        writeln!(
            self.out,
            "{} Output differs from expected ({} {noun}):",
            paint("✗", self.color, |s| s.red().bold()),
            diff.differing_count()
        )?;
        self.out.flush()?;
        self.inner.render_diff(diff)
    }

    fn render_match(&mut self) -> DiffResult<()> {
        writeln!(
            self.out,
            "{} Output matches the expected output!",
            paint("✓", self.color, |s| s.green().bold())
        )?;
        self.out.flush()?;
        self.inner.render_match()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runcheck_diff::{diff_lines, CaptureRenderer};
    use runcheck_lang::Language;

    #[test]
    fn plain_headline_has_no_escape_codes() {
        let mut out = Vec::new();
        let mut announce = Announce::new(CaptureRenderer::default(), &mut out, false);
        announce.render_diff(&diff_lines(b"1\n2\n", b"1\n3\n")).unwrap();
        assert_eq!(announce.inner.differing().count(), 1);
        drop(announce);

        assert_eq!(String::from_utf8(out).unwrap(), "✗ Output differs from expected (1 line):\n");
    }

    #[test]
    fn plain_match_headline() {
        let mut out = Vec::new();
        let mut announce = Announce::new(CaptureRenderer::default(), &mut out, false);
        announce.render_match().unwrap();
        assert!(announce.inner.matched);
        drop(announce);

        assert_eq!(String::from_utf8(out).unwrap(), "✓ Output matches the expected output!\n");
    }

    #[test]
    fn coloured_headline_is_styled() {
        colored::control::set_override(true);
        let mut out = Vec::new();
        Announce::new(CaptureRenderer::default(), &mut out, true).render_match().unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('\x1b'));
        assert!(text.ends_with("Output matches the expected output!\n"));
    }

    #[test]
    fn stage_lines() {
        assert_eq!(stage_line(Stage::Compiling(Language::Cpp), false), "Compiling C++...");
        assert_eq!(
            stage_line(Stage::Interpreted(Language::Python), false),
            "Python doesn't require compilation."
        );
        assert_eq!(stage_line(Stage::Executing, false), "Executing...");
        assert_eq!(stage_line(Stage::Comparing, false), "Comparing outputs...");
    }
}
