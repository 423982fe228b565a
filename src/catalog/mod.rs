//! Gettext catalog parsing.
//!
//! A catalog (`.po`) file is a sequence of entries, each mapping a
//! source-language `msgid` (optionally qualified by a `msgctxt` and a
//! `msgid_plural`) to one or more translations. Entries carry free-form
//! comment lines and a flag set (`#, fuzzy` and friends), and every parsed
//! entry remembers the source line span it was read from so that diff lines
//! can later be mapped back onto it.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub mod escape;
pub mod parser;

pub use escape::{escape, unescape};
pub use parser::{CatalogParse, CatalogParser, ParseWarning, parse_entries, parse_entries_at};

/// An inclusive 1-based range of source lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.start && line <= self.end
    }

    /// True if any line in `lines` falls inside this span.
    pub fn intersects(&self, lines: &BTreeSet<usize>) -> bool {
        lines.range(self.start..=self.end).next().is_some()
    }
}

impl fmt::Display for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A named field within a catalog entry.
///
/// Comments and flag lines are part of the entry span but are not fields;
/// change attribution only names the keyword fields below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKind {
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    /// An indexed plural translation, `msgstr[N]`.
    MsgstrPlural(usize),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Msgctxt => write!(f, "msgctxt"),
            FieldKind::Msgid => write!(f, "msgid"),
            FieldKind::MsgidPlural => write!(f, "msgid_plural"),
            FieldKind::Msgstr => write!(f, "msgstr"),
            FieldKind::MsgstrPlural(n) => write!(f, "msgstr[{}]", n),
        }
    }
}

/// One logical entry from a catalog file.
///
/// Translation fields distinguish "absent" from "present but empty":
/// `msgstr: Some(String::new())` is an untranslated entry whose `msgstr`
/// keyword exists in the file, while `None` means the file had no singular
/// translation field at all (e.g. a plural-only entry).
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Comment lines verbatim, including their `#` prefix (`#, …` flag
    /// lines are parsed into `flags` instead).
    pub comments: Vec<String>,
    pub flags: BTreeSet<String>,
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgstr: Option<String>,
    /// Indexed plural translations, keyed by the `N` in `msgstr[N]`.
    pub plural_msgstr: BTreeMap<usize, String>,
    /// Lines this entry occupies in the file it was parsed from,
    /// comments included.
    pub span: LineSpan,
    /// Per-field line ranges, in file order. Continuation literals extend
    /// the range of the field they belong to.
    pub fields: Vec<(FieldKind, LineSpan)>,
}

impl CatalogEntry {
    /// The header pseudo-entry carries the catalog metadata in its msgstr
    /// and has an empty msgid with no context.
    pub fn is_header(&self) -> bool {
        self.msgid.is_empty() && self.msgctxt.is_none()
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.contains("fuzzy")
    }

    /// True if any translation field carries non-empty text.
    pub fn is_translated(&self) -> bool {
        self.msgstr.as_deref().is_some_and(|s| !s.is_empty())
            || self.plural_msgstr.values().any(|s| !s.is_empty())
    }

    /// Identity of this entry within one file: context, id, and plural id.
    pub fn key(&self) -> (Option<&str>, &str, Option<&str>) {
        (
            self.msgctxt.as_deref(),
            self.msgid.as_str(),
            self.msgid_plural.as_deref(),
        )
    }

    /// The singular translation, or the lowest-indexed plural form when the
    /// entry only has plural translations. Used for display.
    pub fn primary_translation(&self) -> Option<&str> {
        self.msgstr
            .as_deref()
            .or_else(|| self.plural_msgstr.values().next().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;

    #[test]
    fn test_span_contains() {
        let span = LineSpan::new(10, 13);
        assert!(span.contains(10));
        assert!(span.contains(12));
        assert!(span.contains(13));
        assert!(!span.contains(9));
        assert!(!span.contains(14));
    }

    #[test]
    fn test_span_intersects() {
        let span = LineSpan::new(10, 13);
        let hit: BTreeSet<usize> = [3, 12, 40].into_iter().collect();
        let miss: BTreeSet<usize> = [3, 14, 40].into_iter().collect();
        assert!(span.intersects(&hit));
        assert!(!span.intersects(&miss));
        assert!(!span.intersects(&BTreeSet::new()));
    }

    #[test]
    fn test_span_display() {
        assert_eq!(LineSpan::new(5, 5).to_string(), "5");
        assert_eq!(LineSpan::new(5, 8).to_string(), "5-8");
    }

    #[test]
    fn test_field_kind_display() {
        assert_eq!(FieldKind::Msgid.to_string(), "msgid");
        assert_eq!(FieldKind::MsgidPlural.to_string(), "msgid_plural");
        assert_eq!(FieldKind::MsgstrPlural(2).to_string(), "msgstr[2]");
    }

    fn empty_entry() -> CatalogEntry {
        CatalogEntry {
            comments: Vec::new(),
            flags: BTreeSet::new(),
            msgctxt: None,
            msgid: String::new(),
            msgid_plural: None,
            msgstr: None,
            plural_msgstr: BTreeMap::new(),
            span: LineSpan::new(1, 1),
            fields: Vec::new(),
        }
    }

    #[test]
    fn test_is_header() {
        let mut entry = empty_entry();
        entry.msgstr = Some("Project-Id-Version: test\n".to_string());
        assert!(entry.is_header());

        entry.msgid = "Hello".to_string();
        assert!(!entry.is_header());

        // An empty msgid with a context is a real entry, not the header.
        entry.msgid.clear();
        entry.msgctxt = Some("menu".to_string());
        assert!(!entry.is_header());
    }

    #[test]
    fn test_is_translated() {
        let mut entry = empty_entry();
        entry.msgid = "Hello".to_string();
        assert!(!entry.is_translated());

        entry.msgstr = Some(String::new());
        assert!(!entry.is_translated());

        entry.msgstr = Some("Hallo".to_string());
        assert!(entry.is_translated());

        entry.msgstr = None;
        entry.plural_msgstr.insert(0, String::new());
        assert!(!entry.is_translated());
        entry.plural_msgstr.insert(1, "Hallos".to_string());
        assert!(entry.is_translated());
    }

    #[test]
    fn test_primary_translation_prefers_singular() {
        let mut entry = empty_entry();
        entry.plural_msgstr.insert(0, "eins".to_string());
        assert_eq!(entry.primary_translation(), Some("eins"));

        entry.msgstr = Some("ein".to_string());
        assert_eq!(entry.primary_translation(), Some("ein"));
    }
}
