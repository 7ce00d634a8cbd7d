//! Markdown to plain text, for sinks that cannot take styling.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn re(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("valid regex"))
}

fn bold() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"\*\*(.*?)\*\*")
}

fn italic() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"\*([^\s*][^*\n]*?)\*")
}

fn fenced_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"(?s)```(\w*)\n?(.*?)```")
}

fn inline_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"`([^`]+)`")
}

fn heading_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"(?m)^#{1,6}[ \t]+")
}

fn link() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"\[([^\]]+)\]\([^)]+\)")
}

fn rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"(?m)^-{3,}[ \t]*$")
}

fn bullet_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"(?m)^[ \t]*[-*+][ \t]+")
}

fn number_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"(?m)^[ \t]*\d+\.[ \t]+")
}

fn blank_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(&RE, r"\n{3,}")
}

fn any_markdown() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    re(
        &RE,
        r"(?m)\*\*.*?\*\*|\*[^*\n]*\*|`[^`\n]*`|^#{1,6}[ \t]+|^[ \t]*[-*+][ \t]+|^[ \t]*\d+\.[ \t]+",
    )
}

/// Strip markdown markup, keeping the words. Bullets become `• `, numbered markers and
/// horizontal rules disappear, and runs of blank lines shrink to one.
pub fn to_plain_text(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }
    let s = bold().replace_all(markdown, "$1");
    let s = italic().replace_all(&s, "$1");
    let s = fenced_code().replace_all(&s, |caps: &Captures<'_>| caps[2].to_string());
    let s = inline_code().replace_all(&s, "$1");
    let s = heading_marker().replace_all(&s, "");
    let s = link().replace_all(&s, "$1");
    let s = rule().replace_all(&s, "");
    let s = bullet_marker().replace_all(&s, "\u{2022} ");
    let s = number_marker().replace_all(&s, "");
    let s = blank_runs().replace_all(&s, "\n\n");
    s.trim().to_string()
}

/// True when `text` carries emphasis, code, headings or list markup.
pub fn has_markdown(text: &str) -> bool {
    !text.is_empty() && any_markdown().is_match(text)
}
