mod cli;
mod db;
mod error;
mod fmt;
mod grid;
mod logging;
mod models;
mod settings;
mod store;
mod tui;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(&settings::load_settings());

    let result = match cli.command {
        None => cli::expense_manager::run(),
        Some(Commands::Init { data_dir }) => cli::init::run(data_dir),
        Some(Commands::Add {
            amount,
            category,
            date,
            description,
        }) => cli::expenses::add(&amount, &category, date.as_deref(), &description),
        Some(Commands::List { json }) => cli::expenses::list(json),
        Some(Commands::Delete { position, id, yes }) => cli::expenses::delete(position, id, yes),
        Some(Commands::Clear { yes }) => cli::expenses::clear(yes),
        Some(Commands::Export { output }) => cli::expenses::export(output),
        Some(Commands::Backup { output }) => cli::backup::run(output),
        Some(Commands::Status) => cli::status::run(),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
