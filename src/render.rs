//! Presentation selector and text mock renderers.
//!
//! Each renderer turns a [`GenerationResult`] into plain display lines that look roughly like the
//! target platform. Both the text mode and the TUI draw from these lines.

use crate::model::{GenerationResult, PlatformFormat};
use crate::normalize::length_label;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    ThreadMock,
    PhotoCaptionMock,
    ProfessionalPostMock,
}

pub fn select_renderer(format: PlatformFormat) -> Renderer {
    match format {
        PlatformFormat::Thread => Renderer::ThreadMock,
        PlatformFormat::PhotoCaption => Renderer::PhotoCaptionMock,
        PlatformFormat::ProfessionalPost => Renderer::ProfessionalPostMock,
    }
}

/// One display line of a mock preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewLine {
    /// Account name / handle header.
    Header(String),
    Muted(String),
    Body(String),
    Placeholder(String),
    Separator,
    Blank,
}

impl PreviewLine {
    pub fn text(&self) -> &str {
        match self {
            PreviewLine::Header(s)
            | PreviewLine::Muted(s)
            | PreviewLine::Body(s)
            | PreviewLine::Placeholder(s) => s,
            PreviewLine::Separator => "────────────────────────",
            PreviewLine::Blank => "",
        }
    }
}

fn body_lines(out: &mut Vec<PreviewLine>, text: &str) {
    for line in text.lines() {
        out.push(PreviewLine::Body(line.to_string()));
    }
}

/// Render the mock preview for `result`. Empty results render nothing.
pub fn render_preview(result: &GenerationResult, format: PlatformFormat) -> Vec<PreviewLine> {
    let mut out = Vec::new();
    let Some(first) = result.units.first() else {
        return out;
    };

    match select_renderer(format) {
        Renderer::ThreadMock => {
            out.push(PreviewLine::Header("User Name".into()));
            out.push(PreviewLine::Muted("@username".into()));
            out.push(PreviewLine::Blank);
            for (i, unit) in result.units.iter().enumerate() {
                if i > 0 {
                    out.push(PreviewLine::Separator);
                }
                body_lines(&mut out, unit);
                out.push(PreviewLine::Muted("◷ Just now".into()));
            }
        }
        Renderer::PhotoCaptionMock => {
            out.push(PreviewLine::Header("username".into()));
            out.push(PreviewLine::Placeholder("[ photo ]".into()));
            out.push(PreviewLine::Blank);
            body_lines(&mut out, first);
        }
        Renderer::ProfessionalPostMock => {
            out.push(PreviewLine::Header("User Name".into()));
            out.push(PreviewLine::Muted("Job Title".into()));
            out.push(PreviewLine::Blank);
            body_lines(&mut out, first);
            out.push(PreviewLine::Blank);
            out.push(PreviewLine::Muted("◷ Just now".into()));
        }
    }
    out
}

/// Raw content view: each unit with its length annotation for threads.
pub fn render_content(result: &GenerationResult, format: PlatformFormat) -> Vec<String> {
    let mut lines = Vec::new();
    match format {
        PlatformFormat::Thread => {
            for (i, unit) in result.units.iter().enumerate() {
                if i > 0 {
                    lines.push(String::new());
                }
                lines.push(format!("[{}] {}", i + 1, length_label(unit)));
                lines.extend(unit.lines().map(str::to_string));
            }
        }
        _ => {
            if let Some(unit) = result.units.first() {
                lines.extend(unit.lines().map(str::to_string));
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(units: &[&str]) -> GenerationResult {
        GenerationResult {
            units: units.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn each_format_has_its_own_renderer() {
        assert_eq!(select_renderer(PlatformFormat::Thread), Renderer::ThreadMock);
        assert_eq!(
            select_renderer(PlatformFormat::PhotoCaption),
            Renderer::PhotoCaptionMock
        );
        assert_eq!(
            select_renderer(PlatformFormat::ProfessionalPost),
            Renderer::ProfessionalPostMock
        );
    }

    #[test]
    fn empty_result_renders_nothing() {
        assert!(render_preview(&GenerationResult::default(), PlatformFormat::Thread).is_empty());
    }

    #[test]
    fn thread_preview_shows_every_unit() {
        let lines = render_preview(&result(&["one", "two"]), PlatformFormat::Thread);
        let bodies: Vec<_> = lines
            .iter()
            .filter(|l| matches!(l, PreviewLine::Body(_)))
            .map(|l| l.text())
            .collect();
        assert_eq!(bodies, vec!["one", "two"]);
        assert_eq!(
            lines.iter().filter(|l| **l == PreviewLine::Separator).count(),
            1
        );
    }

    #[test]
    fn caption_preview_has_photo_placeholder() {
        let lines = render_preview(&result(&["sunny"]), PlatformFormat::PhotoCaption);
        assert!(lines.contains(&PreviewLine::Placeholder("[ photo ]".into())));
        assert!(lines.contains(&PreviewLine::Body("sunny".into())));
    }

    #[test]
    fn thread_content_is_annotated_with_length() {
        let lines = render_content(
            &result(&["Tweet 1 text", "Tweet 2 text"]),
            PlatformFormat::Thread,
        );
        assert_eq!(
            lines,
            vec!["[1] 12/280", "Tweet 1 text", "", "[2] 12/280", "Tweet 2 text"]
        );
    }

    #[test]
    fn post_content_has_no_annotation() {
        let lines = render_content(&result(&["Line a\nLine b"]), PlatformFormat::ProfessionalPost);
        assert_eq!(lines, vec!["Line a", "Line b"]);
    }
}
