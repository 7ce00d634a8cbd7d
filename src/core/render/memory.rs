//! In-memory document with staged writes. Backs the CLI output and the tests.

use serde::Serialize;

use super::HeadingLevel;
use super::sink::{DocumentSink, SinkError};
use super::style::BlockStyle;

/// Paragraph kind as stored in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphKind {
    Heading,
    SubHeading,
    Body,
    ListItem,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocParagraph {
    pub kind: ParagraphKind,
    pub text: String,
    pub style: BlockStyle,
}

/// Paragraph list plus an optional staging copy that `commit` publishes.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    committed: Vec<DocParagraph>,
    staged: Option<Vec<DocParagraph>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document pre-filled with unstyled body paragraphs.
    pub fn with_text<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            committed: lines
                .into_iter()
                .map(|l| DocParagraph {
                    kind: ParagraphKind::Body,
                    text: l.into(),
                    style: BlockStyle::PLAIN,
                })
                .collect(),
            staged: None,
        }
    }

    pub fn paragraphs(&self) -> &[DocParagraph] {
        &self.committed
    }

    fn push(
        &mut self,
        kind: ParagraphKind,
        text: &str,
        style: &BlockStyle,
    ) -> Result<(), SinkError> {
        let staged = self
            .staged
            .as_mut()
            .ok_or_else(|| SinkError::Insert("no open transaction".to_string()))?;
        staged.push(DocParagraph {
            kind,
            text: text.to_string(),
            style: *style,
        });
        Ok(())
    }

    /// Plain-text rendering: list items get a bullet glyph and indentation.
    pub fn to_text(&self) -> String {
        self.committed
            .iter()
            .map(|p| match p.kind {
                ParagraphKind::ListItem => format!("  \u{2022} {}", p.text),
                _ => p.text.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DocumentSink for MemoryDocument {
    /// Opens the transaction. Nested transactions are rejected.
    fn clear_region(&mut self) -> Result<(), SinkError> {
        if self.staged.is_some() {
            return Err(SinkError::Clear("transaction already open".to_string()));
        }
        self.staged = Some(Vec::new());
        Ok(())
    }

    fn insert_heading_block(
        &mut self,
        text: &str,
        level: HeadingLevel,
        style: &BlockStyle,
    ) -> Result<(), SinkError> {
        let kind = match level {
            HeadingLevel::Main => ParagraphKind::Heading,
            HeadingLevel::Sub => ParagraphKind::SubHeading,
        };
        self.push(kind, text, style)
    }

    fn insert_paragraph_block(
        &mut self,
        text: &str,
        style: &BlockStyle,
    ) -> Result<(), SinkError> {
        self.push(ParagraphKind::Body, text, style)
    }

    fn insert_list_item(&mut self, text: &str, style: &BlockStyle) -> Result<(), SinkError> {
        self.push(ParagraphKind::ListItem, text, style)
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        let staged = self
            .staged
            .take()
            .ok_or_else(|| SinkError::Commit("nothing staged".to_string()))?;
        self.committed = staged;
        Ok(())
    }

    fn abandon(&mut self) {
        self.staged = None;
    }
}
