//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `scan`: Extract changed/added translations from a unified diff
//! - `count`: Count translated strings per locale (no diff required)
//! - `init`: Initialize a poscan configuration file

use std::fmt;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Scan(cmd)) => cmd.args.common.verbose,
            Some(Command::Count(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Locale directory containing the catalog files (overrides config file)
    #[arg(long, env = "POSCAN_LOCALE_ROOT")]
    pub locale_root: Option<PathBuf>,

    /// Catalog file extension, without the dot (overrides config file)
    #[arg(long, env = "POSCAN_EXTENSION")]
    pub extension: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// Machine-readable JSON on stdout
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct ScanArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Path to a unified diff of catalog changes ('-' for stdin)
    #[arg(long)]
    pub diff: Option<String>,

    /// Two git revisions to diff (runs 'git diff BASE HEAD' internally)
    #[arg(long, num_args = 2, value_names = ["BASE", "HEAD"])]
    pub diff_commits: Option<Vec<String>>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Only report entries whose translation is non-empty
    #[arg(long)]
    pub translated_only: bool,
}

#[derive(Debug, Args)]
pub struct ScanCommand {
    #[command(flatten)]
    pub args: ScanArgs,
}

#[derive(Debug, Parser)]
pub struct CountArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CountCommand {
    #[command(flatten)]
    pub args: CountArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract changed or newly added translations from a unified diff
    Scan(ScanCommand),
    /// Count translated strings per locale
    Count(CountCommand),
    /// Initialize a new .poscanrc.json configuration file
    Init,
}
