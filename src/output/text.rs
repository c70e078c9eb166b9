//! Human-readable report.
//!
//! Records are printed in report order (same-file, cross-file, whole-file),
//! one sentence each followed by the shared blocks indented underneath. A
//! counters table and the pass/fail line close the report.

use std::fmt::Write as _;
use std::io;

use yansi::{Paint, Style};

use crate::duplicates::{sort_for_report, DuplicateRecord, RecordKind, RunState, Verdict};

/// Default number of lines shown per shared block.
pub const DEFAULT_EXCERPT_LINES: usize = 6;

/// Text report formatter.
pub struct TextReport<'a> {
    records: Vec<DuplicateRecord>,
    state: &'a RunState,
    verdict: &'a Verdict,
    color: bool,
    excerpt_lines: usize,
}

impl<'a> TextReport<'a> {
    /// Create a report over `records` in any order.
    #[must_use]
    pub fn new(records: &'a [DuplicateRecord], state: &'a RunState, verdict: &'a Verdict) -> Self {
        Self {
            records: report_order(records),
            state,
            verdict,
            color: true,
            excerpt_lines: DEFAULT_EXCERPT_LINES,
        }
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Limit each block excerpt to `lines` lines (0 hides excerpts).
    #[must_use]
    pub fn with_excerpt_lines(mut self, lines: usize) -> Self {
        self.excerpt_lines = lines;
        self
    }

    /// Render the whole report.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        for record in &self.records {
            let style = match record.kind {
                RecordKind::WholeFileDuplicate => Style::new().red().bold(),
                RecordKind::CrossFileBlockDuplicate => Style::new().yellow(),
                RecordKind::SameFileBlockDuplicate => Style::new().cyan(),
            };
            let _ = writeln!(out, "{}", self.paint(&record.describe(), style));
            self.render_excerpts(&mut out, record);
            out.push('\n');
        }

        self.render_table(&mut out);
        out.push('\n');

        let verdict_style = if self.verdict.passed {
            Style::new().black().on_green()
        } else {
            Style::new().white().on_red()
        };
        let _ = writeln!(out, "{}", self.paint(&self.verdict.summary(), verdict_style));
        out
    }

    /// Write the rendered report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())
    }

    fn render_excerpts(&self, out: &mut String, record: &DuplicateRecord) {
        if self.excerpt_lines == 0 {
            return;
        }
        let dim = Style::new().dim();
        for content in &record.contents {
            let lines: Vec<&str> = content.lines().collect();
            for line in lines.iter().take(self.excerpt_lines) {
                let _ = writeln!(out, "    {}", self.paint(line, dim));
            }
            if lines.len() > self.excerpt_lines {
                let more = lines.len() - self.excerpt_lines;
                let _ = writeln!(out, "    {}", self.paint(&format!("... ({more} more)"), dim));
            }
            out.push('\n');
        }
    }

    fn render_table(&self, out: &mut String) {
        let rows = [
            ("Files analyzed", self.state.total_files),
            ("Lines analyzed", self.state.total_lines),
            ("Duplicated lines", self.state.duped_lines),
            ("Duplicate files", self.state.num_file_dupes),
            ("Duplicate blocks", self.state.num_block_dupes),
            ("Duplicate blocks within files", self.state.num_block_dupes_in_same_file),
        ];
        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let _ = writeln!(out, "{}", self.paint("Summary", Style::new().bold()));
        for (label, value) in rows {
            let _ = writeln!(out, "  {label:<width$}  {value:>8}");
        }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.paint(style).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Records in report order, for callers that render them some other way.
#[must_use]
pub fn report_order(records: &[DuplicateRecord]) -> Vec<DuplicateRecord> {
    let mut sorted = records.to_vec();
    sort_for_report(&mut sorted);
    sorted
}
