use std::process::ExitCode;

use crate::commands::CommandSummary;

/// Exit status for CLI commands, following common conventions for CI tools.
///
/// - `Success` (0): Command completed, every file in the diff was handled
/// - `Failure` (1): Command completed, but parts of the input had to be
///   skipped (malformed hunks, unparseable catalog files)
/// - `Error` (2): Command failed due to internal error (config error,
///   unreadable diff, git failure)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl ExitStatus {
    pub fn from_summary(summary: &CommandSummary) -> Self {
        match summary {
            CommandSummary::Scan(scan) if scan.has_problems() => ExitStatus::Failure,
            CommandSummary::Count(count) if !count.failures.is_empty() => ExitStatus::Failure,
            _ => ExitStatus::Success,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
