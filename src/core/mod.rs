pub mod app;
pub mod config;
pub mod error;
pub mod paths;
pub mod payload;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod stream;
pub mod text;
pub mod trigger;
