//! Report formatting and printing utilities.
//!
//! This module is separate from the core library logic to allow poscan
//! to be used as a library without printing side effects.

use std::collections::BTreeMap;

use colored::Colorize;
use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::commands::{CommandSummary, CountSummary, InitSummary, ScanSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::extract::ChangedEntry;
use crate::utils::truncate_display;

/// Maximum display width for msgid/msgstr excerpts in the text report.
const EXCERPT_WIDTH: usize = 60;

pub fn print(summary: &CommandSummary, verbose: bool) {
    match summary {
        CommandSummary::Scan(scan) => print_scan(scan, verbose),
        CommandSummary::Count(count) => print_count(count),
        CommandSummary::Init(init) => print_init(init),
    }
}

fn print_scan(summary: &ScanSummary, verbose: bool) {
    if summary.format == OutputFormat::Json {
        print_scan_json(summary);
        return;
    }

    if summary.empty_diff {
        println!("Empty diff, nothing to check.");
        return;
    }

    for failure in &summary.failures {
        eprintln!(
            "{}: {}: {}",
            "error".bold().red(),
            failure.file_path,
            failure.error
        );
    }
    for diagnostic in &summary.diff_diagnostics {
        eprintln!(
            "{}: diff line {}: {}",
            "warning".bold().yellow(),
            diagnostic.line,
            diagnostic.message
        );
    }
    if verbose {
        for path in &summary.reconstructed {
            eprintln!(
                "{}: {}: working tree copy unavailable, reconstructed from diff",
                "note".bold(),
                path
            );
        }
        for warning in &summary.catalog_warnings {
            eprintln!(
                "{}: {}:{}: {}",
                "note".bold(),
                warning.file_path,
                warning.warning.line,
                warning.warning.message
            );
        }
    }

    for entry in &summary.entries {
        print_changed_entry(entry);
    }

    let noun = if summary.entries.len() == 1 {
        "translation"
    } else {
        "translations"
    };
    println!(
        "Found {} changed {} in {} catalog {}.",
        summary.entries.len(),
        noun,
        summary.files_scanned,
        if summary.files_scanned == 1 {
            "file"
        } else {
            "files"
        },
    );
}

fn print_changed_entry(entry: &ChangedEntry) {
    let fields = entry
        .changed_fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    println!(
        "{}: \"{}\"  {}",
        "changed".bold().green(),
        truncate_display(&entry.entry.msgid, EXCERPT_WIDTH),
        fields.dimmed().cyan()
    );
    println!(
        "  {} {}:{}",
        "-->".blue(),
        entry.file_path,
        entry.entry.span.start
    );

    match entry.entry.primary_translation() {
        Some(text) if !text.is_empty() => println!(
            "   {} translation ({}): \"{}\"",
            "=".blue(),
            entry.locale,
            truncate_display(text, EXCERPT_WIDTH)
        ),
        _ => println!("   {} translation ({}): empty", "=".blue(), entry.locale),
    }
    if entry.entry.is_fuzzy() {
        println!("   {} {} fuzzy", "=".blue(), "note:".bold());
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    changed: Vec<JsonEntry<'a>>,
    failures: &'a [crate::commands::FileFailure],
    files_scanned: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonEntry<'a> {
    file: &'a str,
    locale: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    msgctxt: Option<&'a str>,
    msgid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    msgid_plural: Option<&'a str>,
    msgstr: Option<&'a str>,
    plural_msgstr: &'a BTreeMap<usize, String>,
    changed_fields: Vec<String>,
    fuzzy: bool,
    line: usize,
}

impl<'a> From<&'a ChangedEntry> for JsonEntry<'a> {
    fn from(changed: &'a ChangedEntry) -> Self {
        Self {
            file: &changed.file_path,
            locale: &changed.locale,
            msgctxt: changed.entry.msgctxt.as_deref(),
            msgid: &changed.entry.msgid,
            msgid_plural: changed.entry.msgid_plural.as_deref(),
            msgstr: changed.entry.msgstr.as_deref(),
            plural_msgstr: &changed.entry.plural_msgstr,
            changed_fields: changed
                .changed_fields
                .iter()
                .map(ToString::to_string)
                .collect(),
            fuzzy: changed.entry.is_fuzzy(),
            line: changed.entry.span.start,
        }
    }
}

fn print_scan_json(summary: &ScanSummary) {
    let report = JsonReport {
        changed: summary.entries.iter().map(JsonEntry::from).collect(),
        failures: &summary.failures,
        files_scanned: summary.files_scanned,
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(error) => eprintln!("{}: failed to serialize report: {}", "error".bold().red(), error),
    }
}

fn print_count(summary: &CountSummary) {
    for failure in &summary.failures {
        eprintln!(
            "{}: {}: {}",
            "warning".bold().yellow(),
            failure.file_path,
            failure.error
        );
    }
    for count in &summary.locales {
        let files = if count.files == 1 {
            String::new()
        } else {
            format!(" across {} files", count.files)
        };
        println!("{}: {} strings{}", count.locale, count.translated, files);
    }
    println!();
    println!("Total: {} translated strings", summary.total);
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!("Created {CONFIG_FILE_NAME}");
    }
}
