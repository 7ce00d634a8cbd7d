//! Request kinds, in-document `/ai` trigger detection, and the message text envelope.

use std::fmt;
use std::str::FromStr;

/// Prefix a user types into the document to ask for processing.
pub const TRIGGER_PREFIX: &str = "/ai";

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RequestKind {
    /// Summarize the selection or whole document.
    #[value(name = "summary")]
    Summarize,
    /// Validate the document's structure.
    #[value(name = "validate")]
    ValidateStructure,
    /// Free-form text following the `/ai` command.
    #[value(name = "text")]
    ProcessText,
}

impl RequestKind {
    /// Stable name used by the host side of the add-in.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::Summarize => "documentSummary",
            RequestKind::ValidateStructure => "structureValidation",
            RequestKind::ProcessText => "textToProcess",
        }
    }

    /// Instruction placed ahead of the document content.
    pub fn prompt(self) -> &'static str {
        match self {
            RequestKind::Summarize => {
                "Please provide a comprehensive summary of this document, highlighting the main points and key information."
            }
            RequestKind::ValidateStructure => {
                "Please validate the structure of this document and provide a detailed response based on its content."
            }
            RequestKind::ProcessText => "",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "documentSummary" | "summarizeDocument" => Ok(RequestKind::Summarize),
            "structureValidation" | "validateStructure" => Ok(RequestKind::ValidateStructure),
            "textToProcess" | "selectedText" => Ok(RequestKind::ProcessText),
            other => Err(format!("unknown request kind: {}", other)),
        }
    }
}

/// A request raised from the document: kind plus the text to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub kind: RequestKind,
    pub text: String,
}

impl Trigger {
    /// Selection wins over the whole document when it has content.
    pub fn for_kind(kind: RequestKind, selected: &str, document: &str) -> Self {
        let selected = selected.trim();
        let text = if selected.is_empty() {
            document.trim()
        } else {
            selected
        };
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// Detect an `/ai` command anywhere in the document text (case-insensitive). The command
/// prefix is removed from the start of the returned text.
pub fn detect_trigger(document_text: &str) -> Option<Trigger> {
    if !document_text.to_lowercase().contains(TRIGGER_PREFIX) {
        return None;
    }
    let trimmed = document_text.trim();
    let text = match trimmed.get(..TRIGGER_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(TRIGGER_PREFIX) => {
            trimmed[TRIGGER_PREFIX.len()..].trim()
        }
        _ => trimmed,
    };
    Some(Trigger {
        kind: RequestKind::ProcessText,
        text: text.to_string(),
    })
}

/// Wrap prompt and content in the analysis request envelope sent as `message_text`.
pub fn compose_message(kind: RequestKind, content: &str) -> String {
    format!(
        "\nDOCUMENT ANALYSIS REQUEST:\n\n{}\n\nDOCUMENT CONTENT TO ANALYZE:\n{}\n\nPlease provide a detailed analysis based on the above document content.\n",
        kind.prompt(),
        content
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_and_strips_leading_command() {
        let t = detect_trigger("  /ai rewrite this paragraph  ").unwrap();
        assert_eq!(t.kind, RequestKind::ProcessText);
        assert_eq!(t.text, "rewrite this paragraph");
    }

    #[test]
    fn detection_is_case_insensitive() {
        let t = detect_trigger("/AI make it shorter").unwrap();
        assert_eq!(t.text, "make it shorter");
    }

    #[test]
    fn command_in_the_middle_keeps_full_text() {
        let t = detect_trigger("Intro text /ai please expand").unwrap();
        assert_eq!(t.text, "Intro text /ai please expand");
    }

    #[test]
    fn no_command_no_trigger() {
        assert!(detect_trigger("plain document").is_none());
    }

    #[test]
    fn selection_wins_over_document() {
        let t = Trigger::for_kind(RequestKind::Summarize, "  picked  ", "whole doc");
        assert_eq!(t.text, "picked");
        let t = Trigger::for_kind(RequestKind::Summarize, "   ", " whole doc ");
        assert_eq!(t.text, "whole doc");
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in [
            RequestKind::Summarize,
            RequestKind::ValidateStructure,
            RequestKind::ProcessText,
        ] {
            assert_eq!(kind.as_str().parse::<RequestKind>().unwrap(), kind);
        }
        assert!("nope".parse::<RequestKind>().is_err());
    }

    #[test]
    fn message_envelope_contains_prompt_and_content() {
        let msg = compose_message(RequestKind::Summarize, "Body text");
        assert!(msg.contains("DOCUMENT ANALYSIS REQUEST:"));
        assert!(msg.contains(RequestKind::Summarize.prompt()));
        assert!(msg.contains("DOCUMENT CONTENT TO ANALYZE:\nBody text"));
    }
}
