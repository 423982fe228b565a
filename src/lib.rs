//! Poscan - changed-translation extractor for gettext catalogs
//!
//! Poscan is a CLI tool and library for pulling changed or newly added
//! translation entries out of a unified diff of gettext `.po` files. It
//! reconstructs complete logical entries (msgid/msgstr pairs) even when a
//! diff hunk only shows a fragment of one, so downstream review tooling
//! always sees whole strings instead of diff fragments.
//!
//! ## Module Structure
//!
//! - `catalog`: Catalog file parsing (string escapes, entries, line spans)
//! - `cli`: Command-line interface layer (user-facing commands and output)
//! - `commands`: Command implementations (`scan`, `count`, `init`)
//! - `config`: Configuration file loading and parsing
//! - `diff`: Unified diff parsing and locale-path filtering
//! - `extract`: Reconciliation of diff hunks against entry boundaries
//! - `sources`: Diff text acquisition (file, stdin, git revisions)
//! - `utils`: Shared utility functions

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod diff;
pub mod extract;
pub mod sources;
pub mod utils;
