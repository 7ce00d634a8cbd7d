//! Split preview text into prose and fenced code blocks.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PreviewSegment<'a> {
    Prose(&'a str),
    Code { lang: &'a str, code: &'a str },
}

/// Cut `content` at ``` fences. An unclosed fence runs to the end of the text.
pub(crate) fn parse_segments(content: &str) -> Vec<PreviewSegment<'_>> {
    let mut segments = Vec::new();
    let mut rest = content;
    while let Some(open) = rest.find("```") {
        if open > 0 {
            segments.push(PreviewSegment::Prose(&rest[..open]));
        }
        let after_fence = &rest[open + 3..];
        let (lang, body) = match after_fence.split_once('\n') {
            Some((lang, body)) => (lang.trim(), body),
            None => (after_fence.trim(), ""),
        };
        // The closing fence may sit on its own line or directly after the code.
        let (code, after) = match body.find("\n```") {
            Some(pos) => (&body[..pos], &body[pos + 4..]),
            None => match body.find("```") {
                Some(pos) => (&body[..pos], &body[pos + 3..]),
                None => (body, ""),
            },
        };
        segments.push(PreviewSegment::Code { lang, code });
        rest = after;
    }
    if !rest.is_empty() {
        segments.push(PreviewSegment::Prose(rest));
    }
    segments
}
