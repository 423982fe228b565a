//! Command implementations.
//!
//! Each command returns a summary value; printing happens in the CLI
//! layer so the library stays free of output side effects.

pub mod count;
pub mod scan;

pub use count::{CountSummary, LocaleCount, count};
pub use scan::{FileFailure, ScanSummary, scan};

#[derive(Debug)]
pub enum CommandSummary {
    Scan(ScanSummary),
    Count(CountSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}
