//! Document sink adapter: blocks to insert operations, applied as one overwrite.

mod memory;
mod sink;
mod style;

use serde::Serialize;

use crate::core::session::RequestTicket;
use crate::core::text::Block;

pub use memory::MemoryDocument;
pub use sink::{DocumentSink, SinkError};
pub use style::BlockStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingLevel {
    Main,
    Sub,
}

/// One sink call. A list block expands to one `ListItem` per item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum InsertOp {
    Heading { text: String, level: HeadingLevel },
    Paragraph { text: String },
    ListItem { text: String },
    /// Blank line between two top-level blocks.
    Separator,
}

impl InsertOp {
    pub fn style(&self) -> BlockStyle {
        match self {
            InsertOp::Heading {
                level: HeadingLevel::Main,
                ..
            } => BlockStyle::HEADING,
            InsertOp::Heading {
                level: HeadingLevel::Sub,
                ..
            } => BlockStyle::SUBHEADING,
            InsertOp::Paragraph { .. } => BlockStyle::PARAGRAPH,
            InsertOp::ListItem { .. } => BlockStyle::LIST_ITEM,
            InsertOp::Separator => BlockStyle::PLAIN,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            InsertOp::Heading { text, .. }
            | InsertOp::Paragraph { text }
            | InsertOp::ListItem { text } => text,
            InsertOp::Separator => "",
        }
    }
}

/// Map blocks to insert operations, with a separator before every block but the first.
pub fn render(blocks: &[Block]) -> Vec<InsertOp> {
    let mut ops = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            ops.push(InsertOp::Separator);
        }
        match block {
            Block::Heading { text } => ops.push(InsertOp::Heading {
                text: text.clone(),
                level: HeadingLevel::Main,
            }),
            Block::SubHeading { text } => ops.push(InsertOp::Heading {
                text: text.clone(),
                level: HeadingLevel::Sub,
            }),
            Block::List { items } => ops.extend(
                items
                    .iter()
                    .map(|item| InsertOp::ListItem { text: item.clone() }),
            ),
            Block::Paragraph { text } => ops.push(InsertOp::Paragraph { text: text.clone() }),
        }
    }
    ops
}

/// Failure that aborted an apply; the document keeps its previous content.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error(transparent)]
    Clear(SinkError),
    #[error("Plain-text fallback also failed: {0}")]
    Insert(SinkError),
    #[error(transparent)]
    Commit(SinkError),
}

/// What an apply did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Document replaced. `fallbacks` counts ops inserted as plain text.
    Applied { ops: usize, fallbacks: usize },
    /// A newer request began; the document was left untouched.
    Superseded,
}

fn insert_styled<S: DocumentSink + ?Sized>(sink: &mut S, op: &InsertOp) -> Result<(), SinkError> {
    let style = op.style();
    match op {
        InsertOp::Heading { text, level } => sink.insert_heading_block(text, *level, &style),
        InsertOp::Paragraph { text } => sink.insert_paragraph_block(text, &style),
        InsertOp::ListItem { text } => sink.insert_list_item(text, &style),
        InsertOp::Separator => sink.insert_paragraph_block("", &style),
    }
}

/// Replace the sink's region with `ops` in one transaction.
///
/// A rejected styled insert is retried as a plain paragraph with the same text. No-op if
/// `ticket` is stale before or right after the clear.
pub fn apply<S: DocumentSink + ?Sized>(
    ops: &[InsertOp],
    sink: &mut S,
    ticket: &RequestTicket,
) -> Result<ApplyOutcome, ApplyError> {
    if !ticket.is_current() {
        log::info!(
            "Skipping document update for superseded request {}",
            ticket.generation()
        );
        return Ok(ApplyOutcome::Superseded);
    }

    if let Err(e) = sink.clear_region() {
        sink.abandon();
        return Err(ApplyError::Clear(e));
    }
    if !ticket.is_current() {
        log::info!(
            "Request {} superseded during clear; discarding changes",
            ticket.generation()
        );
        sink.abandon();
        return Ok(ApplyOutcome::Superseded);
    }

    let mut fallbacks = 0;
    for op in ops {
        if let Err(e) = insert_styled(sink, op) {
            log::warn!("Styled insert failed ({}); inserting plain text", e);
            if let Err(e) = sink.insert_paragraph_block(op.text(), &BlockStyle::PLAIN) {
                sink.abandon();
                return Err(ApplyError::Insert(e));
            }
            fallbacks += 1;
        }
    }

    if let Err(e) = sink.commit() {
        sink.abandon();
        return Err(ApplyError::Commit(e));
    }
    log::info!("Document updated with {} ops ({} plain fallbacks)", ops.len(), fallbacks);
    Ok(ApplyOutcome::Applied {
        ops: ops.len(),
        fallbacks,
    })
}
