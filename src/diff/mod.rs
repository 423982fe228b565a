//! Unified diff parsing and filtering.
//!
//! The parser turns raw `git diff` / `diff -u` output into per-file
//! patches; the filter narrows those down to catalog files under the
//! locale root. Both are pure over their text inputs.

use std::collections::BTreeSet;

pub mod filter;
pub mod parser;

pub use filter::{is_catalog_path, locale_of, locale_patches};
pub use parser::{DiffDiagnostic, DiffParse, parse_diff};

/// Classification of one line within a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    Context,
    Added,
    Removed,
}

/// One line of a hunk, with the marker stripped.
///
/// `old_line`/`new_line` are 1-based positions in the old and new file;
/// a removed line has no new position and an added line no old one.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffLine {
    pub tag: LineTag,
    pub content: String,
    pub old_line: Option<usize>,
    pub new_line: Option<usize>,
}

/// A contiguous block of change within one file.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffHunk {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    pub lines: Vec<DiffLine>,
}

impl DiffHunk {
    /// New-file line numbers of the added lines, in hunk order.
    pub fn added_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines
            .iter()
            .filter(|line| line.tag == LineTag::Added)
            .filter_map(|line| line.new_line)
    }
}

/// How a file changed, derived from the `---`/`+++` sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// All hunks of one file within a diff.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePatch {
    /// Old-side path; `None` for newly added files.
    pub old_path: Option<String>,
    /// New-side path; `None` for deleted files.
    pub new_path: Option<String>,
    pub status: FileStatus,
    pub hunks: Vec<DiffHunk>,
}

impl FilePatch {
    /// The path that identifies the file after the change (the old path
    /// for deletions, since the new side is `/dev/null`).
    pub fn effective_path(&self) -> Option<&str> {
        match self.status {
            FileStatus::Deleted => self.old_path.as_deref(),
            _ => self.new_path.as_deref().or(self.old_path.as_deref()),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.status == FileStatus::Deleted
    }

    /// New-file line numbers of all added lines across all hunks.
    pub fn added_line_set(&self) -> BTreeSet<usize> {
        self.hunks.iter().flat_map(DiffHunk::added_lines).collect()
    }
}
