//! Answer text reconstruction: normalization and block segmentation.

mod normalize;
mod segment;

pub use normalize::{display_text, normalize};
pub use segment::{Block, segment};

/// Normalize then segment a finalized answer.
pub fn reconstruct(final_text: &str) -> Vec<Block> {
    segment(&normalize(final_text))
}
