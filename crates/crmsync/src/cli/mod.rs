//! CLI command definitions.

pub mod customers;

use clap::{Parser, Subcommand, ValueEnum};

use customers::{CreateArgs, ExportArgs, ListArgs, UpdateArgs};

/// Customer records over a simulated remote store.
#[derive(Debug, Parser)]
#[command(name = "crmsync")]
#[command(version, about = "Customer records over a simulated remote store", long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, env = "CRMSYNC_FORMAT", default_value = "pretty", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List customers one page at a time.
    List(ListArgs),
    /// Customer counts by status.
    Stats,
    /// Export the filtered customer list as CSV.
    Export(ExportArgs),
    /// Create a customer.
    Create(CreateArgs),
    /// Update fields of a customer.
    Update(UpdateArgs),
    /// Delete a customer by ID.
    Delete {
        /// Customer ID.
        id: String,
    },
    /// Run a scripted session through the whole sync layer.
    Demo,
}
