//! Line-break normalization for captured body text.
//!
//! A captured body ends up inside one log line. Any CR or LF left in it would
//! split that line in line-oriented sinks, so every line-break sequence
//! (`\r\n`, bare `\r`, bare `\n`) is removed. Other whitespace is kept.

use std::borrow::Cow;

fn is_line_break(c: char) -> bool {
    c == '\r' || c == '\n'
}

/// Remove every line-break sequence from `text`.
///
/// Returns the input borrowed when there is nothing to strip, which makes
/// re-normalizing an already clean string free.
pub fn strip_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains(is_line_break) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().filter(|c| !is_line_break(*c)).collect())
}

/// Decode body bytes as UTF-8 (lossily) and normalize the result.
pub fn body_text(bytes: &[u8]) -> String {
    strip_line_breaks(&String::from_utf8_lossy(bytes)).into_owned()
}
