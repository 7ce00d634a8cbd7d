//! Per-block styling tiers.

use serde::Serialize;

/// Font and paragraph formatting applied to one inserted block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockStyle {
    pub font: Option<&'static str>,
    pub size_pt: Option<f32>,
    pub bold: bool,
    pub color: Option<&'static str>,
    pub left_indent_pt: f32,
    pub space_after_pt: f32,
}

/// Body font used for every styled block.
pub const BODY_FONT: &str = "Calibri";
/// Accent color for main headings.
pub const ACCENT_COLOR: &str = "#2B579A";

impl BlockStyle {
    pub const HEADING: BlockStyle = BlockStyle {
        font: Some(BODY_FONT),
        size_pt: Some(16.0),
        bold: true,
        color: Some(ACCENT_COLOR),
        left_indent_pt: 0.0,
        space_after_pt: 12.0,
    };

    pub const SUBHEADING: BlockStyle = BlockStyle {
        font: Some(BODY_FONT),
        size_pt: Some(14.0),
        bold: true,
        color: None,
        left_indent_pt: 0.0,
        space_after_pt: 8.0,
    };

    pub const LIST_ITEM: BlockStyle = BlockStyle {
        font: Some(BODY_FONT),
        size_pt: None,
        bold: false,
        color: None,
        left_indent_pt: 36.0,
        space_after_pt: 0.0,
    };

    pub const PARAGRAPH: BlockStyle = BlockStyle {
        font: Some(BODY_FONT),
        size_pt: None,
        bold: false,
        color: None,
        left_indent_pt: 0.0,
        space_after_pt: 0.0,
    };

    /// No formatting at all: separators and fallback inserts.
    pub const PLAIN: BlockStyle = BlockStyle {
        font: None,
        size_pt: None,
        bold: false,
        color: None,
        left_indent_pt: 0.0,
        space_after_pt: 0.0,
    };
}
