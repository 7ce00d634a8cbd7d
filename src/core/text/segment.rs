//! Block segmentation: classify normalized lines into headings, lists, and paragraphs.
//!
//! Single left-to-right pass, no lookahead. Blank lines only separate; they never become
//! blocks. Rule order per line: markdown `#` heading, bullet item, heading shape,
//! paragraph. The bullet check runs before the heading shape, so `- Summary:` is a list
//! item.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Max words for a line to count as a heading.
pub const HEADING_MAX_WORDS: usize = 5;

/// One classified unit of structured text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { text: String },
    SubHeading { text: String },
    List { items: Vec<String> },
    Paragraph { text: String },
}

impl Block {
    /// Text lines this block was built from, in order (paragraphs yield one joined line).
    #[cfg(test)]
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Block::Heading { text } | Block::SubHeading { text } | Block::Paragraph { text } => {
                vec![text.as_str()]
            }
            Block::List { items } => items.iter().map(String::as_str).collect(),
        }
    }
}

fn heading_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][A-Za-z0-9 ]+[:.]?$").expect("valid regex"))
}

/// `- item` or `* item` with non-empty content. Returns the item text.
pub(crate) fn list_item_text(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let item = rest.trim_start();
    (!item.is_empty()).then_some(item)
}

/// Heading shape: capitalized, letters/digits/spaces only, optional trailing `:` or `.`,
/// at most [`HEADING_MAX_WORDS`] words.
pub(crate) fn is_heading(line: &str) -> bool {
    !line.starts_with('-')
        && heading_shape().is_match(line)
        && line.split_whitespace().count() <= HEADING_MAX_WORDS
}

/// Markdown ATX heading: `#` is a main heading, `##` and deeper are subheadings.
fn atx_heading(line: &str) -> Option<Block> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(' ') {
        return None;
    }
    let text = rest.trim().trim_end_matches('#').trim_end().to_string();
    if text.is_empty() {
        return None;
    }
    Some(if hashes == 1 {
        Block::Heading { text }
    } else {
        Block::SubHeading { text }
    })
}

/// Segment normalized text into blocks. Empty input yields no blocks.
pub fn segment(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut open: Option<Block> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(heading) = atx_heading(line) {
            blocks.extend(open.take());
            blocks.push(heading);
        } else if let Some(item) = list_item_text(line) {
            match open.as_mut() {
                Some(Block::List { items }) => items.push(item.to_string()),
                _ => {
                    blocks.extend(open.take());
                    open = Some(Block::List {
                        items: vec![item.to_string()],
                    });
                }
            }
        } else if is_heading(line) {
            blocks.extend(open.take());
            blocks.push(Block::Heading {
                text: line.to_string(),
            });
        } else {
            match open.as_mut() {
                Some(Block::Paragraph { text }) => {
                    text.push(' ');
                    text.push_str(line);
                }
                _ => {
                    blocks.extend(open.take());
                    open = Some(Block::Paragraph {
                        text: line.to_string(),
                    });
                }
            }
        }
    }

    blocks.extend(open);
    blocks
}
