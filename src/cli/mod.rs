pub mod backup;
pub mod expense_manager;
pub mod expenses;
pub mod init;
pub mod status;

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::settings::Settings;
use crate::store::Store;

/// Store for the configured data directory, created and initialized if needed.
pub(crate) fn open_store(settings: &Settings) -> Result<Store> {
    let store = Store::new(settings.db_path());
    store.initialize()?;
    Ok(store)
}

/// Ask a y/N question on stdin. Anything but `y`/`yes` is a no.
pub(crate) fn confirm(question: &str) -> bool {
    print!("{question} (y/N) ");
    io::stdout().flush().ok();
    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[derive(Parser)]
#[command(
    name = "spendlog",
    version,
    about = "Record personal expenses in a local SQLite database.",
    long_about = "Record personal expenses in a local SQLite database.\n\nRun without a subcommand to open the interactive expense form."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for spendlog data (default: ~/Documents/spendlog)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Record an expense.
    Add {
        /// Amount, e.g. 12.50
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Category, e.g. Food, Travel, Shopping, Bills, Other
        #[arg(long)]
        category: String,
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Optional note
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List all expenses.
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Delete one expense by list position or id.
    Delete {
        /// Position shown in the `#` column of `spendlog list`
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        position: Option<usize>,
        /// Expense id shown in the `ID` column of `spendlog list`
        #[arg(long)]
        id: Option<i64>,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Delete every expense.
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Export expenses as CSV.
    Export {
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<String>,
    },
    /// Back up the database.
    Backup {
        /// Output path (default: <data_dir>/backups/spendlog-YYYYMMDD-HHMMSS.db)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show the data location and summary statistics.
    Status,
}
