//! # doc-assistant
//!
//! Sends document requests to a streaming answer service over WebSocket and rebuilds the
//! answer as a structured document (headings, lists, paragraphs). Recorded answers can be
//! reformatted, replayed, or previewed offline.

mod cli;
mod core;
mod preview;
mod run;

use clap::Parser;
use dotenv::dotenv;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let args = cli::Args::parse();
    run::init_logger(&args);

    // Print user-friendly message; exit uses Display not Debug
    if let Err(e) = run::dispatch(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
