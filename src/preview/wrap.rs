//! Width-bounded wrapping that keeps the text's own line breaks.

/// Wrap every line of `text` to `width` columns. Blank lines survive; `0` disables wrapping.
pub fn wrap_preview(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.split('\n') {
        if line.is_empty() || width == 0 {
            out.push(line.to_string());
            continue;
        }
        out.extend(
            textwrap::wrap(line, width)
                .into_iter()
                .map(|chunk| chunk.into_owned()),
        );
    }
    out
}
