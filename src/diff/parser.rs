//! Parser for unified diff text.
//!
//! Handles `git diff` output as well as plain `diff -u` concatenations.
//! Parsing is tolerant: metadata lines it does not know are skipped, and a
//! malformed hunk drops only the patch of the file it belongs to, recorded
//! as a diagnostic, while every other file still parses.

use std::sync::LazyLock;

use regex::Regex;

use super::{DiffHunk, DiffLine, FilePatch, FileStatus, LineTag};

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("hunk header pattern")
});

/// A per-fragment problem found while parsing. The affected file's patch
/// is dropped; the rest of the diff is unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffDiagnostic {
    /// 1-based line in the diff text.
    pub line: usize,
    /// Path of the file section the problem occurred in, when known.
    pub path: Option<String>,
    pub message: String,
}

/// Result of parsing one diff.
#[derive(Debug, Default)]
pub struct DiffParse {
    pub patches: Vec<FilePatch>,
    pub diagnostics: Vec<DiffDiagnostic>,
}

/// Parses unified diff text into per-file patches.
pub fn parse_diff(text: &str) -> DiffParse {
    let lines: Vec<&str> = text.lines().collect();
    let mut patches = Vec::new();
    let mut diagnostics = Vec::new();
    let mut current: Option<PatchBuilder> = None;
    let mut hunk: Option<HunkState> = None;

    for (idx, line) in lines.iter().enumerate() {
        let raw = line.trim_end_matches('\r');
        let line_no = idx + 1;

        if let Some(mut state) = hunk.take() {
            if consume_body_line(&mut state, raw) {
                if state.done() {
                    if let Some(builder) = current.as_mut() {
                        builder.hunks.push(state.hunk);
                    }
                } else {
                    hunk = Some(state);
                }
                continue;
            }
            // The declared counts do not match the body; drop this file's
            // patch and reprocess the offending line as a control line.
            diagnostics.push(DiffDiagnostic {
                line: line_no,
                path: current.as_ref().and_then(PatchBuilder::display_path),
                message: format!(
                    "hunk line count mismatch (header at line {})",
                    state.header_line
                ),
            });
            if let Some(builder) = current.as_mut() {
                builder.dropped = true;
            }
        }

        handle_control_line(
            raw,
            line_no,
            &mut current,
            &mut hunk,
            &mut patches,
            &mut diagnostics,
        );
    }

    if let Some(state) = hunk {
        diagnostics.push(DiffDiagnostic {
            line: lines.len(),
            path: current.as_ref().and_then(PatchBuilder::display_path),
            message: format!(
                "truncated hunk at end of diff (header at line {})",
                state.header_line
            ),
        });
        if let Some(builder) = current.as_mut() {
            builder.dropped = true;
        }
    }
    flush_patch(current.take(), &mut patches);

    DiffParse {
        patches,
        diagnostics,
    }
}

/// Consumes one hunk body line. Returns false when the line does not fit
/// the declared old/new lengths.
fn consume_body_line(state: &mut HunkState, raw: &str) -> bool {
    if raw.starts_with('\\') {
        // "\ No newline at end of file"
        return true;
    }
    if let Some(content) = raw.strip_prefix('+') {
        return state.push_added(content);
    }
    if let Some(content) = raw.strip_prefix('-') {
        return state.push_removed(content);
    }
    if raw.is_empty() {
        // Empty context lines sometimes lose their leading space in transit.
        return state.push_context("");
    }
    if let Some(content) = raw.strip_prefix(' ') {
        return state.push_context(content);
    }
    false
}

fn handle_control_line(
    raw: &str,
    line_no: usize,
    current: &mut Option<PatchBuilder>,
    hunk: &mut Option<HunkState>,
    patches: &mut Vec<FilePatch>,
    diagnostics: &mut Vec<DiffDiagnostic>,
) {
    if let Some(rest) = raw.strip_prefix("diff --git ") {
        flush_patch(current.take(), patches);
        let (git_old, git_new) = parse_git_paths(rest);
        *current = Some(PatchBuilder::new(git_old, git_new));
        return;
    }

    if let Some(rest) = raw.strip_prefix("--- ") {
        // A fresh old-side header inside an active section means a plain
        // (headerless) concatenated diff; flush and start over.
        let starts_new = current
            .as_ref()
            .is_some_and(|b| !b.hunks.is_empty() || !matches!(b.old, PathSide::Unset));
        if starts_new {
            flush_patch(current.take(), patches);
        }
        current
            .get_or_insert_with(|| PatchBuilder::new(None, None))
            .old = parse_path_side(rest, "a/");
        return;
    }

    if let Some(rest) = raw.strip_prefix("+++ ") {
        current
            .get_or_insert_with(|| PatchBuilder::new(None, None))
            .new = parse_path_side(rest, "b/");
        return;
    }

    if raw.starts_with("@@") {
        let Some(builder) = current.as_mut() else {
            diagnostics.push(DiffDiagnostic {
                line: line_no,
                path: None,
                message: "hunk header outside of any file section".to_string(),
            });
            return;
        };
        match parse_hunk_header(raw) {
            Some((old_start, old_len, new_start, new_len)) => {
                let state = HunkState::new(old_start, old_len, new_start, new_len, line_no);
                if state.done() {
                    builder.hunks.push(state.hunk);
                } else {
                    *hunk = Some(state);
                }
            }
            None => {
                diagnostics.push(DiffDiagnostic {
                    line: line_no,
                    path: builder.display_path(),
                    message: format!("unparseable hunk header: {raw}"),
                });
                builder.dropped = true;
            }
        }
        return;
    }

    if raw.starts_with("rename from") || raw.starts_with("rename to") {
        if let Some(builder) = current.as_mut() {
            builder.renamed = true;
        }
        return;
    }

    if raw.starts_with('\\') {
        return;
    }

    // A body-looking line after a closed hunk means the hunk carried more
    // lines than its header declared.
    if matches!(raw.as_bytes().first(), Some(b'+' | b'-' | b' ')) {
        if let Some(builder) = current.as_mut() {
            if !builder.dropped && !builder.hunks.is_empty() {
                diagnostics.push(DiffDiagnostic {
                    line: line_no,
                    path: builder.display_path(),
                    message: "hunk contains more lines than its header declared".to_string(),
                });
                builder.dropped = true;
            }
        }
    }
    // Everything else (index lines, mode lines, "Binary files …", commit
    // message text) is metadata we do not need.
}

enum PathSide {
    Unset,
    DevNull,
    Path(String),
}

impl PathSide {
    /// Resolves to the final path, falling back to the `diff --git` path
    /// when no `---`/`+++` line was seen. The bool reports an explicit
    /// `/dev/null` side.
    fn resolve(self, fallback: Option<String>) -> (Option<String>, bool) {
        match self {
            PathSide::Unset => (fallback, false),
            PathSide::DevNull => (None, true),
            PathSide::Path(path) => (Some(path), false),
        }
    }
}

struct PatchBuilder {
    git_old: Option<String>,
    git_new: Option<String>,
    old: PathSide,
    new: PathSide,
    renamed: bool,
    hunks: Vec<DiffHunk>,
    dropped: bool,
}

impl PatchBuilder {
    fn new(git_old: Option<String>, git_new: Option<String>) -> Self {
        Self {
            git_old,
            git_new,
            old: PathSide::Unset,
            new: PathSide::Unset,
            renamed: false,
            hunks: Vec::new(),
            dropped: false,
        }
    }

    fn display_path(&self) -> Option<String> {
        match (&self.new, &self.old) {
            (PathSide::Path(p), _) | (_, PathSide::Path(p)) => Some(p.clone()),
            _ => self.git_new.clone().or_else(|| self.git_old.clone()),
        }
    }
}

fn flush_patch(builder: Option<PatchBuilder>, patches: &mut Vec<FilePatch>) {
    let Some(builder) = builder else {
        return;
    };
    if builder.dropped {
        return;
    }
    let (old_path, old_devnull) = builder.old.resolve(builder.git_old);
    let (new_path, new_devnull) = builder.new.resolve(builder.git_new);
    if old_path.is_none() && new_path.is_none() && !old_devnull && !new_devnull {
        return;
    }
    let status = if old_devnull {
        FileStatus::Added
    } else if new_devnull {
        FileStatus::Deleted
    } else if builder.renamed || (old_path.is_some() && new_path.is_some() && old_path != new_path)
    {
        FileStatus::Renamed
    } else {
        FileStatus::Modified
    };
    patches.push(FilePatch {
        old_path,
        new_path,
        status,
        hunks: builder.hunks,
    });
}

/// Splits the `a/<old> b/<new>` tail of a `diff --git` line. Best effort
/// for paths containing spaces.
fn parse_git_paths(rest: &str) -> (Option<String>, Option<String>) {
    let rest = rest.trim();
    let Some(split) = rest.find(" b/") else {
        return (None, None);
    };
    let old = rest[..split].strip_prefix("a/").map(str::to_string);
    let new = Some(rest[split + 3..].to_string());
    (old, new)
}

fn parse_path_side(rest: &str, prefix: &str) -> PathSide {
    // Classic diffs append a tab plus timestamp after the path.
    let path = rest.split('\t').next().unwrap_or(rest).trim();
    if path == "/dev/null" {
        return PathSide::DevNull;
    }
    let path = path.strip_prefix(prefix).unwrap_or(path);
    PathSide::Path(path.to_string())
}

fn parse_hunk_header(line: &str) -> Option<(usize, usize, usize, usize)> {
    let caps = HUNK_HEADER.captures(line)?;
    let old_start = caps[1].parse().ok()?;
    let old_len = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 1,
    };
    let new_start = caps[3].parse().ok()?;
    let new_len = match caps.get(4) {
        Some(m) => m.as_str().parse().ok()?,
        None => 1,
    };
    Some((old_start, old_len, new_start, new_len))
}

/// Line-number bookkeeping for one hunk: counters start at the declared
/// starts and fold forward per consumed line.
struct HunkState {
    old_next: usize,
    new_next: usize,
    old_left: usize,
    new_left: usize,
    header_line: usize,
    hunk: DiffHunk,
}

impl HunkState {
    fn new(
        old_start: usize,
        old_len: usize,
        new_start: usize,
        new_len: usize,
        header_line: usize,
    ) -> Self {
        Self {
            old_next: old_start,
            new_next: new_start,
            old_left: old_len,
            new_left: new_len,
            header_line,
            hunk: DiffHunk {
                old_start,
                old_len,
                new_start,
                new_len,
                lines: Vec::with_capacity(old_len + new_len),
            },
        }
    }

    fn done(&self) -> bool {
        self.old_left == 0 && self.new_left == 0
    }

    fn push_context(&mut self, content: &str) -> bool {
        if self.old_left == 0 || self.new_left == 0 {
            return false;
        }
        self.hunk.lines.push(DiffLine {
            tag: LineTag::Context,
            content: content.to_string(),
            old_line: Some(self.old_next),
            new_line: Some(self.new_next),
        });
        self.old_next += 1;
        self.new_next += 1;
        self.old_left -= 1;
        self.new_left -= 1;
        true
    }

    fn push_removed(&mut self, content: &str) -> bool {
        if self.old_left == 0 {
            return false;
        }
        self.hunk.lines.push(DiffLine {
            tag: LineTag::Removed,
            content: content.to_string(),
            old_line: Some(self.old_next),
            new_line: None,
        });
        self.old_next += 1;
        self.old_left -= 1;
        true
    }

    fn push_added(&mut self, content: &str) -> bool {
        if self.new_left == 0 {
            return false;
        }
        self.hunk.lines.push(DiffLine {
            tag: LineTag::Added,
            content: content.to_string(),
            old_line: None,
            new_line: Some(self.new_next),
        });
        self.new_next += 1;
        self.new_left -= 1;
        true
    }
}
