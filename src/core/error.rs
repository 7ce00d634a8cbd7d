//! Top-level error for a document request.

use crate::core::config::ConfigError;
use crate::core::render::ApplyError;
use crate::core::stream::StreamError;

#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error(transparent)]
    Apply(#[from] ApplyError),
}
