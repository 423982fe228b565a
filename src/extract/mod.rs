//! Reconciliation of diff hunks against catalog entry boundaries.
//!
//! A hunk only shows a few lines of context around a change, but the
//! entry those lines belong to may be much larger (multi-line msgstr,
//! comment block, plural forms). Reconciliation parses the complete
//! post-change file, then maps the diff's added lines back onto entry
//! line spans, so callers always receive whole entries.

use std::collections::BTreeSet;

use anyhow::{Result, bail};

use crate::catalog::{
    CatalogEntry, FieldKind, ParseWarning, parse_entries, parse_entries_at,
};
use crate::diff::{FilePatch, LineTag};

/// A catalog entry that contains at least one added diff line, taken from
/// the post-change version of its file. This is the unit handed to the
/// downstream evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangedEntry {
    pub file_path: String,
    pub locale: String,
    /// Fields whose line ranges contain an added line. Empty when only a
    /// comment or flag line of the entry changed.
    pub changed_fields: BTreeSet<FieldKind>,
    pub entry: CatalogEntry,
}

/// Entries plus the non-fatal parse warnings collected along the way.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    pub entries: Vec<ChangedEntry>,
    pub warnings: Vec<ParseWarning>,
}

/// Reconstructs the complete changed entries of one file patch from the
/// full post-change file text.
///
/// Deleted files yield nothing (translations that only disappear are not
/// evaluated). Text that parses to zero entries despite having content is
/// a per-file failure, surfaced as an error so one corrupt file never
/// blocks the rest of the diff.
pub fn reconcile(patch: &FilePatch, locale: &str, new_text: &str) -> Result<ReconcileOutcome> {
    if patch.is_deleted() {
        return Ok(ReconcileOutcome::default());
    }
    let path = patch.effective_path().unwrap_or_default();

    let parse = parse_entries(new_text);
    if parse.entries.is_empty() && !new_text.trim().is_empty() {
        bail!("no catalog entries could be parsed from {path}");
    }

    let added = patch.added_line_set();
    Ok(ReconcileOutcome {
        entries: changed_entries(parse.entries, &added, path, locale),
        warnings: parse.warnings,
    })
}

/// Fallback reconciliation when the post-change file is not available:
/// each hunk's new-file side is parsed as a catalog fragment in new-file
/// coordinates. Entries whose start lies above a hunk's context radius
/// cannot be reconstructed and are lost.
pub fn reconcile_from_patch(patch: &FilePatch, locale: &str) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();
    if patch.is_deleted() {
        return outcome;
    }
    let path = patch.effective_path().unwrap_or_default();

    for hunk in &patch.hunks {
        let fragment = hunk
            .lines
            .iter()
            .filter(|line| line.tag != LineTag::Removed)
            .map(|line| line.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let mut parse = parse_entries_at(&fragment, hunk.new_start);
        outcome.warnings.append(&mut parse.warnings);

        let added: BTreeSet<usize> = hunk.added_lines().collect();
        for changed in changed_entries(parse.entries, &added, path, locale) {
            // An entry can straddle two hunks; emit it once with the
            // union of its changed fields.
            let seen = outcome
                .entries
                .iter()
                .position(|existing| existing.entry.key() == changed.entry.key());
            match seen {
                Some(index) => {
                    outcome.entries[index]
                        .changed_fields
                        .extend(changed.changed_fields);
                }
                None => outcome.entries.push(changed),
            }
        }
    }
    outcome
}

/// An entry counts as changed when its span contains any added line; its
/// changed fields are those whose own ranges do. A flag-only or
/// whitespace-only edit still qualifies the entry.
fn changed_entries(
    entries: Vec<CatalogEntry>,
    added: &BTreeSet<usize>,
    path: &str,
    locale: &str,
) -> Vec<ChangedEntry> {
    entries
        .into_iter()
        .filter(|entry| !entry.is_header())
        .filter(|entry| entry.span.intersects(added))
        .map(|entry| {
            let changed_fields = entry
                .fields
                .iter()
                .filter(|(_, span)| span.intersects(added))
                .map(|(kind, _)| *kind)
                .collect();
            ChangedEntry {
                file_path: path.to_string(),
                locale: locale.to_string(),
                changed_fields,
                entry,
            }
        })
        .collect()
}
