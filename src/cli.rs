//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use crate::core::trigger::RequestKind;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  doc-assistant ask -k summary report.txt     Summarize a document
  doc-assistant ask notes.txt                 Run the /ai command found in the document
  doc-assistant ask -p \"draft an intro\"       Free-form request
  doc-assistant format answer.txt --json      Rebuild a recorded answer as document ops
  doc-assistant replay session.json           Replay recorded transport events
  doc-assistant preview answer.md --width 80  Show the markdown preview
  doc-assistant config                        Show effective configuration
  doc-assistant completions bash              Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Streams answers from the document assistant service and rebuilds them as structured documents",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a document request to the live service and print the rebuilt document
    Ask {
        /// What to ask for
        #[arg(short = 'k', long, value_enum, default_value_t = RequestKind::ProcessText)]
        kind: RequestKind,
        /// Request text (selection); use '-' to read from stdin
        #[arg(short = 'p', long)]
        prompt: Option<String>,
        /// Document file ('-' for stdin)
        file: Option<PathBuf>,
        /// Print the document as JSON paragraphs
        #[arg(long)]
        json: bool,
        /// Do not show the answer while it streams
        #[arg(long)]
        no_stream: bool,
    },
    /// Rebuild a recorded raw answer into a document
    Format {
        /// Raw answer file ('-' or omitted for stdin)
        file: Option<PathBuf>,
        /// Print the insert operations as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replay a JSON list of transport events through the stream driver
    Replay {
        /// Event script file
        file: PathBuf,
        /// Print the document as JSON paragraphs
        #[arg(long)]
        json: bool,
    },
    /// Render answer text as a markdown preview
    Preview {
        /// Answer file ('-' or omitted for stdin)
        file: Option<PathBuf>,
        /// Wrap width in columns (0 disables wrapping)
        #[arg(long, default_value_t = 0)]
        width: usize,
        /// Strip markdown instead of styling it
        #[arg(long)]
        plain: bool,
    },
    /// Show effective configuration (token redacted)
    Config,
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }

    /// True when the terminal shows the answer while it streams; logs then go to a file.
    pub fn streams_to_terminal(&self) -> bool {
        matches!(
            self.command,
            Commands::Ask {
                no_stream: false,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::*;

    #[test]
    fn log_level_from_flags() {
        let args = Args::parse_from(["doc-assistant", "config"]);
        assert_eq!(args.log_level(), "warn");
        let args = Args::parse_from(["doc-assistant", "-vv", "config"]);
        assert_eq!(args.log_level(), "debug");
        let args = Args::parse_from(["doc-assistant", "config", "-q"]);
        assert_eq!(args.log_level(), "error");
    }

    #[test]
    fn ask_parses_kind_and_file() {
        let args = Args::parse_from(["doc-assistant", "ask", "-k", "summary", "report.txt"]);
        match &args.command {
            Commands::Ask { kind, file, .. } => {
                assert_eq!(*kind, RequestKind::Summarize);
                assert_eq!(file.as_deref(), Some(Path::new("report.txt")));
            }
            _ => panic!("expected ask"),
        }
        assert!(args.streams_to_terminal());
    }

    #[test]
    fn ask_defaults_to_free_text() {
        let args = Args::parse_from(["doc-assistant", "ask", "--no-stream", "-p", "hi"]);
        assert!(matches!(
            args.command,
            Commands::Ask {
                kind: RequestKind::ProcessText,
                ..
            }
        ));
        assert!(!args.streams_to_terminal());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Args::try_parse_from(["doc-assistant", "ask", "-k", "poem"]).is_err());
    }
}
