//! Document sink capability: the only surface used to mutate the target document.

use super::style::BlockStyle;
use super::HeadingLevel;

/// A sink call rejected by the host document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("Failed to clear document: {0}")]
    Clear(String),
    #[error("Failed to insert block: {0}")]
    Insert(String),
    #[error("Failed to commit document changes: {0}")]
    Commit(String),
}

/// Insert-only access to a region of the target document.
///
/// Calls between `clear_region` and `commit` form one transaction; `abandon` drops the
/// uncommitted changes.
pub trait DocumentSink {
    fn clear_region(&mut self) -> Result<(), SinkError>;

    fn insert_heading_block(
        &mut self,
        text: &str,
        level: HeadingLevel,
        style: &BlockStyle,
    ) -> Result<(), SinkError>;

    fn insert_paragraph_block(&mut self, text: &str, style: &BlockStyle)
    -> Result<(), SinkError>;

    fn insert_list_item(&mut self, text: &str, style: &BlockStyle) -> Result<(), SinkError>;

    fn commit(&mut self) -> Result<(), SinkError>;

    fn abandon(&mut self) {}
}
