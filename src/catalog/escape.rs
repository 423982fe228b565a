//! Escape handling for catalog string literals.
//!
//! Catalog files store string values with C-style escape sequences: a
//! backslash followed by `n`, `t`, `r`, `"`, or another backslash. Literals
//! must be unescaped before their content can be compared or displayed, and
//! re-escaped when a literal needs to be reconstructed.

/// Converts the content of a quoted catalog literal into the text it
/// represents.
///
/// Unknown escapes pass the following character through literally (the
/// backslash is dropped), and a trailing lone backslash is kept, so this
/// never fails on arbitrary input.
pub fn unescape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Inverse of [`unescape`]: produces literal content with the escapable
/// characters re-escaped.
pub fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\r', "\\r")
        .replace('"', "\\\"")
}
