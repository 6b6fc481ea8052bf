use crate::error::Result;
use crate::fmt::{format_bytes, money};
use crate::logging::log_path;
use crate::models;
use crate::settings::load_settings;
use crate::store::Store;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db_path = settings.db_path();

    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", db_path.display());
    println!("Log file:   {}", log_path().display());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let expenses = Store::new(&db_path).fetch_all()?;
        println!();
        println!("Expenses:   {}", expenses.len());
        println!("Total:      {}", money(models::total(&expenses)));
    } else {
        println!();
        println!("Database not found. Run `spendlog init` to set up.");
    }

    Ok(())
}
