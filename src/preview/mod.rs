//! Markdown preview of answer text: styled terminal lines plus a plain-text fallback.

mod ansi;
mod markdown;
mod plain;
mod segments;
mod wrap;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::core::text::display_text;

pub use ansi::to_ansi;
pub(crate) use markdown::parse_markdown_inline;
pub use plain::{has_markdown, to_plain_text};
pub(crate) use segments::{PreviewSegment, parse_segments};
pub use wrap::wrap_preview;

/// Headings, list markers and links. Same blue as document headings (#2B579A).
pub(crate) const ACCENT: Color = Color::Rgb(0x2B, 0x57, 0x9A);

/// Inline code and fenced blocks.
pub(crate) const CODE: Color = Color::Rgb(0x7E, 0xC8, 0xE3);

/// Render raw answer text as styled lines wrapped to `width` columns (`0` = no wrap).
pub fn render_preview(raw: &str, width: usize) -> Vec<Line<'static>> {
    let text = display_text(raw);
    let code_style = Style::default().fg(CODE);
    let mut lines = Vec::new();

    for segment in parse_segments(&text) {
        match segment {
            PreviewSegment::Prose(prose) => {
                let prose = prose.trim_matches('\n');
                if prose.trim().is_empty() {
                    continue;
                }
                for chunk in wrap_preview(prose, width) {
                    lines.push(Line::from(parse_markdown_inline(&chunk)));
                }
            }
            PreviewSegment::Code { lang, code } => {
                let label = if lang.is_empty() { "code" } else { lang };
                lines.push(Line::from(Span::styled(
                    format!("\u{250C}\u{2500} {}", label),
                    code_style,
                )));
                let inner = if width == 0 {
                    0
                } else {
                    width.saturating_sub(2).max(1)
                };
                for chunk in wrap_preview(code, inner) {
                    lines.push(Line::from(vec![
                        Span::styled("\u{2502} ", code_style),
                        Span::styled(chunk, code_style),
                    ]));
                }
                lines.push(Line::from(Span::styled("\u{2514}\u{2500}", code_style)));
            }
        }
    }
    lines
}
