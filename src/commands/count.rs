//! The count command: translated-string totals per locale.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

use crate::catalog::parse_entries;
use crate::cli::args::CountCommand;
use crate::commands::scan::FileFailure;
use crate::config::load_config;
use crate::diff::locale_of;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCount {
    pub locale: String,
    pub files: usize,
    pub translated: usize,
}

#[derive(Debug)]
pub struct CountSummary {
    /// Per-locale counts, sorted by locale code.
    pub locales: Vec<LocaleCount>,
    pub total: usize,
    pub failures: Vec<FileFailure>,
}

pub fn count(cmd: CountCommand) -> Result<CountSummary> {
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

    if !locale_root.is_dir() {
        bail!(
            "Locale directory '{}' does not exist.\n\
             Hint: Check your {} 'localeRoot' setting.",
            locale_root.display(),
            crate::config::CONFIG_FILE_NAME
        );
    }

    let mut by_locale: BTreeMap<String, LocaleCount> = BTreeMap::new();
    let mut failures = Vec::new();

    for entry in WalkDir::new(&locale_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(extension.as_str()) {
            continue;
        }

        let path_str = path.to_string_lossy().to_string();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) => {
                failures.push(FileFailure {
                    file_path: path_str,
                    error: error.to_string(),
                });
                continue;
            }
        };

        let locale = locale_of(&path_str, &locale_root);
        let translated = parse_entries(&text)
            .entries
            .iter()
            .filter(|entry| !entry.is_header() && entry.is_translated())
            .count();

        let slot = by_locale.entry(locale.clone()).or_insert(LocaleCount {
            locale,
            files: 0,
            translated: 0,
        });
        slot.files += 1;
        slot.translated += translated;
    }

    let total = by_locale.values().map(|count| count.translated).sum();
    Ok(CountSummary {
        locales: by_locale.into_values().collect(),
        total,
        failures,
    })
}
