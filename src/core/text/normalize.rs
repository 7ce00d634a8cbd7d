//! Text normalization: turns raw streamed answer text into clean, line-structured text.
//!
//! Passes run in a fixed order; each assumes the artifacts removed by the previous ones
//! are gone.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::stream::{TERMINATOR, TERMINATOR_CLOSE};

/// Normalize raw answer text. Total: never fails, empty or blank input yields "".
pub fn normalize(text: &str) -> String {
    let s = strip_terminator_tokens(text);
    let s = unescape(&s);
    let s = strip_emphasis(&s);
    let s = collapse_whitespace(&s);
    let s = replace_typographic(&s);
    s.trim().to_string()
}

/// Raw answer text made readable without losing its markdown markup. Feeds the preview.
pub fn display_text(text: &str) -> String {
    let s = strip_terminator_tokens(text);
    let s = unescape(&s);
    s.replace('\r', "").trim().to_string()
}

/// Remove `<Response>` / `</Response>` wrappers if any survived accumulation.
fn strip_terminator_tokens(s: &str) -> String {
    s.replace(TERMINATOR_CLOSE, "").replace(TERMINATOR, "")
}

/// Resolve escape sequences in one left-to-right scan so `\\n` stays a literal `\n`.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('t') => {
                chars.next();
                out.push('\t');
            }
            Some('r') => {
                chars.next();
            }
            Some(q @ ('"' | '\'')) => {
                chars.next();
                out.push(q);
            }
            Some('\\') => {
                chars.next();
                out.push('\\');
            }
            _ => out.push('\\'),
        }
    }
    out
}

fn single_star_emphasis() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*([^*\s](?:[^*\n]*[^*\s])?)\*").expect("valid regex"))
}

fn single_underscore_emphasis() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(^|[^A-Za-z0-9_])_([^_\s](?:[^_\n]*[^_\s])?)_($|[^A-Za-z0-9_])")
            .expect("valid regex")
    })
}

/// Drop bold/italic delimiters, keeping the enclosed text. A `* ` bullet marker is not
/// emphasis and survives.
fn strip_emphasis(s: &str) -> String {
    let s = s.replace("**", "").replace("__", "");
    let s = single_star_emphasis().replace_all(&s, "$1");
    single_underscore_emphasis()
        .replace_all(&s, "$1$2$3")
        .into_owned()
}

/// Collapse whitespace runs inside each line; keep line breaks, squeeze blank-line runs.
fn collapse_whitespace(s: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut last_blank = false;
    for line in s.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !last_blank && !lines.is_empty() {
                lines.push(String::new());
            }
            last_blank = true;
        } else {
            lines.push(collapsed);
            last_blank = false;
        }
    }
    lines.join("\n")
}

/// Map smart quotes, dashes, and ellipsis to plain ASCII.
fn replace_typographic(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => out.push('"'),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{2014}' | '\u{2013}' | '\u{2012}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{2022}' => out.push('-'),
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' => {}
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_input_normalize_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t \n  "), "");
    }

    #[test]
    fn strips_leftover_terminator_tokens() {
        assert_eq!(normalize("<Response>Hello</Response>"), "Hello");
    }

    #[test]
    fn unescapes_literal_newlines_and_quotes() {
        assert_eq!(normalize(r#"Line one\nSay \"hi\""#), "Line one\nSay \"hi\"");
    }

    #[test]
    fn doubled_backslash_becomes_single() {
        assert_eq!(normalize(r"C:\\temp"), r"C:\temp");
        // An escaped backslash followed by n is not a newline.
        assert_eq!(normalize(r"a\\nb"), r"a\nb");
    }

    #[test]
    fn escaped_newline_tab_starts_clean_line() {
        assert_eq!(normalize(r"Intro\n\t- item"), "Intro\n- item");
    }

    #[test]
    fn strips_bold_and_italic_but_keeps_text() {
        assert_eq!(normalize("**Key** point and *stress* here"), "Key point and stress here");
        assert_eq!(normalize("__bold__ and _soft_ tone"), "bold and soft tone");
    }

    #[test]
    fn keeps_bullet_star_marker() {
        assert_eq!(normalize("* first\n* second"), "* first\n* second");
    }

    #[test]
    fn keeps_underscores_inside_identifiers() {
        assert_eq!(normalize("use snake_case_names"), "use snake_case_names");
    }

    #[test]
    fn collapses_whitespace_within_lines_only() {
        assert_eq!(normalize("a   b\t\tc\n\n\n\nd    e"), "a b c\n\nd e");
    }

    #[test]
    fn replaces_typographic_punctuation() {
        assert_eq!(
            normalize("\u{201C}Quote\u{201D} \u{2014} it\u{2019}s done\u{2026}"),
            "\"Quote\" - it's done..."
        );
    }

    #[test]
    fn display_text_keeps_markdown() {
        assert_eq!(
            display_text(r"**Title**\n- item<Response>"),
            "**Title**\n- item"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = r"**Summary:**\n\n- one  \n- two\nClosing \u2014 note";
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }
}
