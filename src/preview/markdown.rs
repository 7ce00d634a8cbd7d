//! Inline Markdown styling for one preview line.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use super::{ACCENT, CODE};

/// Style a single line: headings, horizontal rules, bullets, numbered items, table rows,
/// then `**bold**`, `` `code` `` and `[links](url)` inside the remaining text.
pub(crate) fn parse_markdown_inline(s: &str) -> Vec<Span<'static>> {
    let trimmed = s.trim_start();

    if let Some((level, title)) = heading(trimmed) {
        let style = if level == 1 {
            Style::default()
                .fg(ACCENT)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        };
        return vec![Span::styled(title.to_string(), style)];
    }

    if is_rule(trimmed) {
        return vec![Span::styled(
            "\u{2500}".repeat(trimmed.chars().count()),
            Style::default().fg(ACCENT),
        )];
    }

    let mut spans = Vec::new();
    if let Some(rest) = bullet(trimmed) {
        spans.push(Span::styled("\u{2022} ", Style::default().fg(ACCENT)));
        spans.extend(inline(rest));
        return spans;
    }

    if let Some((num, rest)) = numbered(trimmed) {
        spans.push(Span::styled(format!("{}. ", num), Style::default().fg(ACCENT)));
        spans.extend(inline(rest));
        return spans;
    }

    if trimmed.starts_with('|') {
        let cells: Vec<&str> = trimmed
            .split('|')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        // Separator rows like |---|:---:| carry no content.
        if cells
            .iter()
            .all(|c| c.chars().all(|ch| matches!(ch, '-' | ':')))
        {
            return vec![Span::styled(
                "\u{2500}".repeat(trimmed.chars().count()),
                Style::default().fg(ACCENT),
            )];
        }
        for (i, cell) in cells.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" \u{2502} ", Style::default().fg(ACCENT)));
            }
            spans.extend(inline(cell));
        }
        return spans;
    }

    inline(s)
}

/// `#`..`######` followed by a space. Returns the level and the title text.
fn heading(s: &str) -> Option<(usize, &str)> {
    let level = s.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let title = s[level..].strip_prefix(' ')?.trim();
    (!title.is_empty()).then_some((level, title))
}

fn is_rule(s: &str) -> bool {
    let s = s.trim_end();
    s.len() >= 3 && s.chars().all(|c| c == '-')
}

fn bullet(s: &str) -> Option<&str> {
    ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| s.strip_prefix(*marker))
}

/// "N. " or "N) " at the start of the line.
fn numbered(s: &str) -> Option<(&str, &str)> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = &s[digits..];
    rest.strip_prefix(". ")
        .or_else(|| rest.strip_prefix(") "))
        .map(|after| (&s[..digits], after))
}

#[derive(Clone, Copy)]
enum Mark {
    Bold,
    Code,
    Link,
}

fn next_mark(s: &str) -> Option<(Mark, usize)> {
    [
        (Mark::Bold, s.find("**")),
        (Mark::Code, s.find('`')),
        (Mark::Link, s.find('[')),
    ]
    .into_iter()
    .filter_map(|(mark, pos)| pos.map(|p| (mark, p)))
    .min_by_key(|&(_, p)| p)
}

/// Inline spans: bold, code, and links. Unclosed markers are kept as literal text.
fn inline(s: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        let Some((mark, pos)) = next_mark(rest) else {
            spans.push(Span::raw(rest.to_string()));
            break;
        };
        if pos > 0 {
            spans.push(Span::raw(rest[..pos].to_string()));
        }
        rest = &rest[pos..];
        match mark {
            Mark::Bold => {
                let body = &rest[2..];
                match body.find("**") {
                    Some(end) => {
                        spans.push(Span::styled(
                            body[..end].to_string(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ));
                        rest = &body[end + 2..];
                    }
                    None => {
                        spans.push(Span::raw("**"));
                        rest = body;
                    }
                }
            }
            Mark::Code => {
                let body = &rest[1..];
                match body.find('`') {
                    Some(end) => {
                        spans.push(Span::styled(body[..end].to_string(), Style::default().fg(CODE)));
                        rest = &body[end + 1..];
                    }
                    None => {
                        spans.push(Span::raw("`"));
                        rest = body;
                    }
                }
            }
            Mark::Link => {
                let body = &rest[1..];
                let link = body.find("](").and_then(|close| {
                    body[close + 2..]
                        .find(')')
                        .map(|paren| (close, close + 2 + paren))
                });
                match link {
                    Some((close, paren)) if !body[..close].contains('[') => {
                        spans.push(Span::styled(
                            body[..close].to_string(),
                            Style::default()
                                .fg(ACCENT)
                                .add_modifier(Modifier::UNDERLINED),
                        ));
                        rest = &body[paren + 1..];
                    }
                    _ => {
                        spans.push(Span::raw("["));
                        rest = body;
                    }
                }
            }
        }
    }
    spans
}
