//! Diff text acquisition.
//!
//! The parsers in this crate only see text; where that text comes from
//! (a file, standard input, or a pair of git revisions) is decided here,
//! at the process boundary.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::{fs, io};

use anyhow::{Context, Result, bail};

/// Where the unified diff text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
    File(PathBuf),
    Stdin,
    /// Runs `git diff <base> <head> -- <locale_root>` in the working tree.
    Commits { base: String, head: String },
}

impl DiffSource {
    /// Builds a source from the CLI arguments. `--diff-commits` wins over
    /// `--diff`; `-` selects standard input.
    pub fn from_args(diff: Option<&str>, commits: Option<&[String]>) -> Option<Self> {
        if let Some([base, head]) = commits {
            return Some(DiffSource::Commits {
                base: base.clone(),
                head: head.clone(),
            });
        }
        match diff {
            Some("-") => Some(DiffSource::Stdin),
            Some(path) => Some(DiffSource::File(PathBuf::from(path))),
            None => None,
        }
    }

    pub fn read(&self, locale_root: &Path) -> Result<String> {
        match self {
            DiffSource::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read diff file: {}", path.display())),
            DiffSource::Stdin => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read diff from stdin")?;
                Ok(text)
            }
            DiffSource::Commits { base, head } => git_diff(base, head, locale_root),
        }
    }
}

fn git_diff(base: &str, head: &str, locale_root: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["diff", base, head, "--"])
        .arg(locale_root)
        .output()
        .context("Failed to run git; is git installed and in PATH?")?;

    if !output.status.success() {
        bail!(
            "git diff {base} {head} failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_from_args_prefers_commits() {
        let commits = vec!["974d671".to_string(), "eab55b5".to_string()];
        let source = DiffSource::from_args(Some("changes.diff"), Some(&commits));
        assert_eq!(
            source,
            Some(DiffSource::Commits {
                base: "974d671".to_string(),
                head: "eab55b5".to_string(),
            }),
        );
    }

    #[test]
    fn test_from_args_stdin_marker() {
        assert_eq!(DiffSource::from_args(Some("-"), None), Some(DiffSource::Stdin));
    }

    #[test]
    fn test_from_args_file() {
        assert_eq!(
            DiffSource::from_args(Some("changes.diff"), None),
            Some(DiffSource::File(PathBuf::from("changes.diff"))),
        );
    }

    #[test]
    fn test_from_args_nothing() {
        assert_eq!(DiffSource::from_args(None, None), None);
    }

    #[test]
    fn test_read_file() {
        use std::io::Write;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("changes.diff");
        let mut file = fs::File::create(&path).expect("create");
        write!(file, "--- a/x\n+++ b/x\n").expect("write");

        let source = DiffSource::File(path);
        let text = source.read(Path::new("locale")).expect("read");
        assert!(text.starts_with("--- a/x"));
    }

    #[test]
    fn test_read_missing_file_fails() {
        let source = DiffSource::File(PathBuf::from("/nonexistent/changes.diff"));
        assert!(source.read(Path::new("locale")).is_err());
    }
}
