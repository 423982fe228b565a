//! Line-oriented scanner for catalog entries.
//!
//! The scanner is best-effort: it extracts every well-formed entry it can
//! find and records a warning for each fragment it has to skip. It never
//! fails hard on arbitrary file content.

use std::collections::{BTreeMap, BTreeSet};

use super::escape::unescape;
use super::{CatalogEntry, FieldKind, LineSpan};

/// A recoverable oddity encountered while scanning catalog text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    /// 1-based line the warning refers to.
    pub line: usize,
    pub message: String,
}

impl ParseWarning {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Result of scanning one catalog file (or fragment).
#[derive(Debug, Default)]
pub struct CatalogParse {
    /// Entries in file order, header entry included.
    pub entries: Vec<CatalogEntry>,
    pub warnings: Vec<ParseWarning>,
}

/// Parses catalog text into entries, collecting skip diagnostics.
pub fn parse_entries(text: &str) -> CatalogParse {
    parse_entries_at(text, 1)
}

/// Like [`parse_entries`], but numbers lines starting at `first_line`.
///
/// Used when the text is a fragment of a larger file (a diff hunk's
/// new-file side) and spans must come out in whole-file coordinates.
pub fn parse_entries_at(text: &str, first_line: usize) -> CatalogParse {
    let mut parser = CatalogParser::at_line(text, first_line);
    let mut entries = Vec::new();
    for entry in parser.by_ref() {
        entries.push(entry);
    }
    CatalogParse {
        entries,
        warnings: parser.into_warnings(),
    }
}

/// Lazy scanner over catalog text, yielding entries in file order.
///
/// The scanner holds no state beyond its position in the input; construct
/// a new one to restart. Warnings accumulate as entries are pulled and are
/// available through [`CatalogParser::into_warnings`] once iteration ends.
pub struct CatalogParser<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    offset: usize,
    pending: Option<EntryBuilder>,
    warnings: Vec<ParseWarning>,
}

impl<'a> CatalogParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::at_line(text, 1)
    }

    pub fn at_line(text: &'a str, first_line: usize) -> Self {
        Self {
            lines: text.lines().enumerate(),
            offset: first_line.saturating_sub(1),
            pending: None,
            warnings: Vec::new(),
        }
    }

    pub fn into_warnings(self) -> Vec<ParseWarning> {
        self.warnings
    }

    /// Finishes the pending entry if `finish` is set, discarding invalid
    /// builders into the warning list.
    fn take_pending(&mut self, finish: bool) -> Option<CatalogEntry> {
        if finish {
            self.pending
                .take()
                .and_then(|builder| builder.finish(&mut self.warnings))
        } else {
            None
        }
    }

    /// Consumes one line. Returns an entry when the line terminated one.
    fn step(&mut self, line_no: usize, raw: &str) -> Option<CatalogEntry> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return self.take_pending(self.pending.is_some());
        }

        if trimmed.starts_with('#') {
            // A comment after the translation fields opens the next entry.
            let boundary = self
                .pending
                .as_ref()
                .is_some_and(EntryBuilder::boundary_reached);
            let finished = self.take_pending(boundary);
            self.pending
                .get_or_insert_with(|| EntryBuilder::new(line_no))
                .push_comment(line_no, trimmed);
            return finished;
        }

        if let Some(parsed) = parse_field_line(trimmed) {
            let FieldLine {
                kind,
                value,
                missing_literal,
            } = parsed;
            if missing_literal {
                self.warnings.push(ParseWarning::new(
                    line_no,
                    format!("field keyword without a quoted literal: {trimmed}"),
                ));
            }
            let finished = {
                let starts_entry = matches!(kind, FieldKind::Msgctxt | FieldKind::Msgid);
                let boundary = self.pending.as_ref().is_some_and(|b| {
                    (starts_entry && b.boundary_reached())
                        || (kind == FieldKind::Msgid && b.has_msgid())
                        || (kind == FieldKind::Msgctxt && (b.has_msgctxt() || b.has_msgid()))
                });
                self.take_pending(boundary)
            };
            self.pending
                .get_or_insert_with(|| EntryBuilder::new(line_no))
                .begin_field(kind, line_no, value);
            return finished;
        }

        if trimmed.starts_with('"') {
            match self.pending.as_mut().filter(|b| b.in_field()) {
                Some(builder) => builder.push_continuation(line_no, trimmed, &mut self.warnings),
                None => self.warnings.push(ParseWarning::new(
                    line_no,
                    "string literal outside of a field",
                )),
            }
            return None;
        }

        self.warnings.push(ParseWarning::new(
            line_no,
            format!("unrecognized line: {trimmed}"),
        ));
        None
    }
}

impl Iterator for CatalogParser<'_> {
    type Item = CatalogEntry;

    fn next(&mut self) -> Option<CatalogEntry> {
        while let Some((idx, raw)) = self.lines.next() {
            let line_no = self.offset + idx + 1;
            if let Some(entry) = self.step(line_no, raw) {
                return Some(entry);
            }
        }
        self.take_pending(true)
    }
}

struct FieldLine {
    kind: FieldKind,
    value: String,
    missing_literal: bool,
}

/// Recognizes a field keyword line (`msgid "…"`, `msgstr[2] "…"`, …).
///
/// Returns `None` for anything that is not a field keyword followed by
/// whitespace or a quote.
fn parse_field_line(trimmed: &str) -> Option<FieldLine> {
    let (kind, rest) = if let Some(rest) = trimmed.strip_prefix("msgid_plural") {
        (FieldKind::MsgidPlural, rest)
    } else if let Some(rest) = trimmed.strip_prefix("msgstr[") {
        let close = rest.find(']')?;
        let index = rest[..close].parse::<usize>().ok()?;
        (FieldKind::MsgstrPlural(index), &rest[close + 1..])
    } else if let Some(rest) = trimmed.strip_prefix("msgstr") {
        (FieldKind::Msgstr, rest)
    } else if let Some(rest) = trimmed.strip_prefix("msgid") {
        (FieldKind::Msgid, rest)
    } else if let Some(rest) = trimmed.strip_prefix("msgctxt") {
        (FieldKind::Msgctxt, rest)
    } else {
        return None;
    };

    if !rest.is_empty() && !rest.starts_with([' ', '\t', '"']) {
        return None;
    }

    match first_literal(rest) {
        Some(value) => Some(FieldLine {
            kind,
            value,
            missing_literal: false,
        }),
        None => Some(FieldLine {
            kind,
            value: String::new(),
            missing_literal: true,
        }),
    }
}

/// Extracts and unescapes the quoted literal of a keyword line, taking
/// everything between the first and last quote characters.
fn first_literal(rest: &str) -> Option<String> {
    let rest = rest.trim();
    let start = rest.find('"')?;
    let end = rest.rfind('"')?;
    if end <= start {
        return None;
    }
    Some(unescape(&rest[start + 1..end]))
}

struct EntryBuilder {
    start: usize,
    end: usize,
    comments: Vec<String>,
    flags: BTreeSet<String>,
    msgctxt: Option<String>,
    msgid: Option<String>,
    msgid_plural: Option<String>,
    msgstr: Option<String>,
    plural_msgstr: BTreeMap<usize, String>,
    fields: Vec<(FieldKind, LineSpan)>,
    current: Option<CurrentField>,
}

struct CurrentField {
    kind: FieldKind,
    span: LineSpan,
    value: String,
}

impl EntryBuilder {
    fn new(start: usize) -> Self {
        Self {
            start,
            end: start,
            comments: Vec::new(),
            flags: BTreeSet::new(),
            msgctxt: None,
            msgid: None,
            msgid_plural: None,
            msgstr: None,
            plural_msgstr: BTreeMap::new(),
            fields: Vec::new(),
            current: None,
        }
    }

    fn has_msgid(&self) -> bool {
        self.msgid.is_some()
            || self
                .current
                .as_ref()
                .is_some_and(|c| c.kind == FieldKind::Msgid)
    }

    fn has_msgctxt(&self) -> bool {
        self.msgctxt.is_some()
            || self
                .current
                .as_ref()
                .is_some_and(|c| c.kind == FieldKind::Msgctxt)
    }

    fn in_field(&self) -> bool {
        self.current.is_some()
    }

    /// True once the entry has reached its msgid/msgstr pair boundary,
    /// i.e. any translation field has been seen.
    fn boundary_reached(&self) -> bool {
        self.msgstr.is_some()
            || !self.plural_msgstr.is_empty()
            || self.current.as_ref().is_some_and(|c| {
                matches!(c.kind, FieldKind::Msgstr | FieldKind::MsgstrPlural(_))
            })
    }

    fn push_comment(&mut self, line_no: usize, line: &str) {
        self.flush_current();
        if let Some(flag_list) = line.strip_prefix("#,") {
            self.flags.extend(
                flag_list
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(String::from),
            );
        } else {
            self.comments.push(line.to_string());
        }
        self.end = line_no;
    }

    fn begin_field(&mut self, kind: FieldKind, line_no: usize, value: String) {
        self.flush_current();
        self.current = Some(CurrentField {
            kind,
            span: LineSpan::new(line_no, line_no),
            value,
        });
        self.end = line_no;
    }

    fn push_continuation(
        &mut self,
        line_no: usize,
        trimmed: &str,
        warnings: &mut Vec<ParseWarning>,
    ) {
        let inner = if trimmed.len() >= 2 && trimmed.ends_with('"') {
            &trimmed[1..trimmed.len() - 1]
        } else {
            warnings.push(ParseWarning::new(line_no, "unterminated string literal"));
            &trimmed[1..]
        };
        if let Some(current) = self.current.as_mut() {
            current.value.push_str(&unescape(inner));
            current.span.end = line_no;
        }
        self.end = line_no;
    }

    fn flush_current(&mut self) {
        let Some(CurrentField { kind, span, value }) = self.current.take() else {
            return;
        };
        match kind {
            FieldKind::Msgctxt => self.msgctxt = Some(value),
            FieldKind::Msgid => self.msgid = Some(value),
            FieldKind::MsgidPlural => self.msgid_plural = Some(value),
            FieldKind::Msgstr => self.msgstr = Some(value),
            FieldKind::MsgstrPlural(index) => {
                self.plural_msgstr.insert(index, value);
            }
        }
        self.fields.push((kind, span));
    }

    /// Builds the finished entry. Blocks without a msgid (stray msgstr,
    /// obsolete `#~` groups, comment-only runs) are discarded; only the
    /// ones that contained actual fields warrant a warning.
    fn finish(mut self, warnings: &mut Vec<ParseWarning>) -> Option<CatalogEntry> {
        self.flush_current();
        let Some(msgid) = self.msgid else {
            if !self.fields.is_empty() {
                warnings.push(ParseWarning::new(self.start, "entry without msgid skipped"));
            }
            return None;
        };
        Some(CatalogEntry {
            comments: self.comments,
            flags: self.flags,
            msgctxt: self.msgctxt,
            msgid,
            msgid_plural: self.msgid_plural,
            msgstr: self.msgstr,
            plural_msgstr: self.plural_msgstr,
            span: LineSpan::new(self.start, self.end),
            fields: self.fields,
        })
    }
}
