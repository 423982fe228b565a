//! The scan command: extract changed entries from a diff.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::ParseWarning;
use crate::cli::args::{OutputFormat, ScanCommand};
use crate::config::load_config;
use crate::diff::{DiffDiagnostic, FilePatch, locale_of, locale_patches, parse_diff};
use crate::extract::{ChangedEntry, ReconcileOutcome, reconcile, reconcile_from_patch};
use crate::sources::DiffSource;

/// A file that could not be reconciled at all.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFailure {
    pub file_path: String,
    pub error: String,
}

/// A parse warning attributed to the catalog file it came from.
#[derive(Debug, Clone)]
pub struct FileWarning {
    pub file_path: String,
    pub warning: ParseWarning,
}

#[derive(Debug)]
pub struct ScanSummary {
    pub format: OutputFormat,
    /// Changed entries in diff order, grouped per file.
    pub entries: Vec<ChangedEntry>,
    /// Files whose post-change text could not be parsed at all.
    pub failures: Vec<FileFailure>,
    /// Per-fragment problems in the diff itself.
    pub diff_diagnostics: Vec<DiffDiagnostic>,
    /// Recoverable catalog parse warnings (shown in verbose mode).
    pub catalog_warnings: Vec<FileWarning>,
    /// Files whose content had to be reconstructed from the diff because
    /// the working tree copy was unreadable.
    pub reconstructed: Vec<String>,
    pub files_scanned: usize,
    pub empty_diff: bool,
}

impl ScanSummary {
    fn empty(format: OutputFormat) -> Self {
        Self {
            format,
            entries: Vec::new(),
            failures: Vec::new(),
            diff_diagnostics: Vec::new(),
            catalog_warnings: Vec::new(),
            reconstructed: Vec::new(),
            files_scanned: 0,
            empty_diff: false,
        }
    }

    /// True when anything went wrong that the caller should know about.
    pub fn has_problems(&self) -> bool {
        !self.failures.is_empty() || !self.diff_diagnostics.is_empty()
    }
}

pub fn scan(cmd: ScanCommand) -> Result<ScanSummary> {
    let args = cmd.args;
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let config = load_config(&cwd)?.config;

    let locale_root = args
        .common
        .locale_root
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.locale_root));
    let extension = args
        .common
        .extension
        .clone()
        .unwrap_or_else(|| config.catalog_extension.clone());
    let ignores = config.ignore_patterns();

    let source = DiffSource::from_args(args.diff.as_deref(), args.diff_commits.as_deref())
        .context("No diff input; pass --diff <path|-> or --diff-commits BASE HEAD")?;
    let diff_text = source.read(&locale_root)?;

    if diff_text.trim().is_empty() {
        let mut summary = ScanSummary::empty(args.format);
        summary.empty_diff = true;
        return Ok(summary);
    }

    let parsed = parse_diff(&diff_text);
    let patches = locale_patches(parsed.patches, &locale_root, &extension, &ignores);

    let mut summary = ScanSummary::empty(args.format);
    summary.diff_diagnostics = parsed.diagnostics;
    summary.files_scanned = patches.len();

    // Files are independent of each other; reconcile them in parallel.
    // The order-preserving collect keeps the output in diff order.
    let scans: Vec<FileScan> = patches
        .par_iter()
        .map(|patch| scan_patch(patch, &locale_root))
        .collect();

    for scan in scans {
        match scan.outcome {
            Ok(outcome) => {
                if scan.reconstructed {
                    summary.reconstructed.push(scan.file_path.clone());
                }
                summary
                    .catalog_warnings
                    .extend(outcome.warnings.into_iter().map(|warning| FileWarning {
                        file_path: scan.file_path.clone(),
                        warning,
                    }));
                summary.entries.extend(outcome.entries);
            }
            Err(error) => summary.failures.push(FileFailure {
                file_path: scan.file_path,
                error: format!("{error:#}"),
            }),
        }
    }

    if args.translated_only {
        summary.entries.retain(|entry| entry.entry.is_translated());
    }

    Ok(summary)
}

struct FileScan {
    file_path: String,
    outcome: Result<ReconcileOutcome>,
    reconstructed: bool,
}

/// Reconciles one patch, preferring the working tree copy of the file and
/// falling back to reconstruction from the diff's own lines.
fn scan_patch(patch: &FilePatch, locale_root: &Path) -> FileScan {
    let file_path = patch.effective_path().unwrap_or_default().to_string();
    let locale = locale_of(&file_path, locale_root);

    match fs::read_to_string(&file_path) {
        Ok(new_text) => FileScan {
            outcome: reconcile(patch, &locale, &new_text),
            reconstructed: false,
            file_path,
        },
        Err(_) => FileScan {
            outcome: Ok(reconcile_from_patch(patch, &locale)),
            reconstructed: !patch.is_deleted(),
            file_path,
        },
    }
}
