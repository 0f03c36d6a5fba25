pub mod categories;
pub mod init;
pub mod seed;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jangbu", about = "Household finance ledger with approval-gated spreadsheet seeding.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up jangbu: choose a data directory and initialize the database.
    Init {
        /// Path for jangbu data (default: ~/Documents/jangbu)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Seed the ledger from a workbook export.
    Seed {
        #[command(subcommand)]
        command: SeedCommands,
    },
    /// Print the category tree.
    Categories,
    /// Show the current database and summary statistics.
    Status,
    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(clap::Args)]
pub struct SeedArgs {
    /// Path to the workbook (.xlsx) export
    pub file: String,
    /// Rows to skip before the data starts
    #[arg(long = "skip-rows", default_value_t = 3)]
    pub skip_rows: usize,
    /// Commit without prompting
    #[arg(long)]
    pub yes: bool,
    /// Print the sample row and the first period's records
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum SeedCommands {
    /// Seed expense transactions from the expense sheet.
    Expenses {
        #[command(flatten)]
        args: SeedArgs,
        /// 1-based sheet number
        #[arg(long, default_value_t = 1)]
        sheet: usize,
    },
    /// Seed income transactions from the income sheet.
    Income {
        #[command(flatten)]
        args: SeedArgs,
        /// 1-based sheet number
        #[arg(long, default_value_t = 2)]
        sheet: usize,
    },
    /// Seed asset snapshots (institutions, accounts, holdings, valuations).
    Assets {
        #[command(flatten)]
        args: SeedArgs,
        /// 1-based sheet number
        #[arg(long, default_value_t = 3)]
        sheet: usize,
    },
}
