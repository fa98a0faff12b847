//! Text summary builder for CLI output.
//!
//! Formats a finished submission as human-readable lines: the raw content, the mock preview and
//! where the result was saved.

use crate::model::{HistoryRecord, PlatformFormat, SubmissionOutcome};
use crate::normalize::{exceeds_cap, units_from_content};
use crate::render::{render_content, render_preview, PreviewLine};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

fn preview_line(line: &PreviewLine) -> String {
    match line {
        PreviewLine::Header(s) => format!("  {s}"),
        PreviewLine::Muted(s) => format!("  {s}"),
        PreviewLine::Body(s) => format!("  {s}"),
        PreviewLine::Placeholder(s) => format!("  {s}"),
        PreviewLine::Separator => format!("  {}", PreviewLine::Separator.text()),
        PreviewLine::Blank => String::new(),
    }
}

/// Build a text summary for one submission.
pub(crate) fn build_text_summary(outcome: &SubmissionOutcome) -> TextSummary {
    let mut lines = Vec::new();
    lines.push(format!(
        "Format: {} ({})",
        outcome.format.label(),
        outcome.format.platform()
    ));
    lines.push(format!("Prompt: {}", outcome.prompt));

    let Some(result) = outcome.result.as_ref() else {
        if let Some(err) = outcome.error.as_deref() {
            lines.push(format!("Error: {err}"));
        }
        return TextSummary { lines };
    };

    lines.push(String::new());
    lines.push("== Content ==".into());
    if result.is_empty() {
        lines.push("(no content)".into());
    }
    lines.extend(render_content(result, outcome.format));

    if outcome.format == PlatformFormat::Thread {
        let over = result.units.iter().filter(|u| exceeds_cap(u)).count();
        if over > 0 {
            lines.push(format!("Note: {over} tweet(s) exceed 280 characters"));
        }
    }

    lines.push(String::new());
    lines.push("== Preview ==".into());
    lines.extend(render_preview(result, outcome.format).iter().map(preview_line));

    lines.push(String::new());
    if let Some(err) = outcome.error.as_deref() {
        lines.push(format!("Error: {err}"));
    }
    if let Some(record) = outcome.record.as_ref() {
        lines.push(format!("Saved to history: {}", record.id));
    }
    if let Some(warn) = outcome.save_error.as_deref() {
        lines.push(format!("Warning: not saved to history: {warn}"));
    }

    TextSummary { lines }
}

/// One line per record for `--history`.
pub(crate) fn build_history_summary(history: &[HistoryRecord]) -> TextSummary {
    if history.is_empty() {
        return TextSummary {
            lines: vec!["No history yet.".into()],
        };
    }
    let lines = history
        .iter()
        .map(|r| {
            let units = units_from_content(&r.content, r.format).units.len();
            format!(
                "{}  {}  {:<18} {:>2} unit(s)  {}",
                r.id,
                r.created_at_display(),
                r.format.label(),
                units,
                r.prompt
            )
        })
        .collect();
    TextSummary { lines }
}
