//! Common utility functions shared across the codebase.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shortens `text` to at most `max_width` display columns, appending an
/// ellipsis when anything was cut. Control characters are made visible so
/// a translation full of newlines still prints on one report line.
///
/// Width is measured in terminal columns, not chars, so CJK text and
/// emoji truncate correctly.
pub fn truncate_display(text: &str, max_width: usize) -> String {
    let printable: String = text
        .chars()
        .map(|c| match c {
            '\n' => '␤',
            '\t' => '␉',
            '\r' => '␍',
            other => other,
        })
        .collect();

    if printable.as_str().width() <= max_width {
        return printable;
    }

    let limit = max_width.saturating_sub(1);
    let mut width = 0;
    let mut out = String::new();
    for c in printable.chars() {
        let char_width = c.width().unwrap_or(0);
        if width + char_width > limit {
            break;
        }
        width += char_width;
        out.push(c);
    }
    out.push('…');
    out
}
