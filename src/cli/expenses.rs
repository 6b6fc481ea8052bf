use std::io;

use colored::Colorize;
use comfy_table::{Cell, Table};

use super::{confirm, open_store};
use crate::error::{Result, SpendError};
use crate::fmt::money;
use crate::models::{self, Expense, NewExpense};
use crate::settings::load_settings;
use crate::store::Store;

pub fn add(amount: &str, category: &str, date: Option<&str>, description: &str) -> Result<()> {
    let store = open_store(&load_settings())?;
    let date = date.map(str::to_string).unwrap_or_else(models::today);
    let expense = NewExpense::parse(amount, category, &date, description)?;
    let id = store.insert(&expense)?;
    println!("{} {amount} {category} on {date} (id {id})", "Added expense:".green());
    Ok(())
}

pub fn list(json: bool) -> Result<()> {
    let store = open_store(&load_settings())?;
    let expenses = store.fetch_all()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&expenses)?);
        return Ok(());
    }
    if expenses.is_empty() {
        println!("No expenses recorded.");
        return Ok(());
    }
    println!("Expenses\n{}", expense_table(&expenses));
    println!("Total: {}", money(models::total(&expenses)).bold());
    Ok(())
}

fn expense_table(expenses: &[Expense]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "ID", "Amount", "Category", "Date", "Description"]);
    for (i, e) in expenses.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(e.id),
            Cell::new(&e.amount),
            Cell::new(&e.category),
            Cell::new(&e.date),
            Cell::new(&e.description),
        ]);
    }
    table
}

pub fn delete(position: Option<usize>, id: Option<i64>, yes: bool) -> Result<()> {
    let store = open_store(&load_settings())?;
    let id = resolve_id(&store, position, id)?;
    if !yes && !confirm(&format!("Delete expense {id}?")) {
        println!("Cancelled.");
        return Ok(());
    }
    if !store.delete_by_id(id)? {
        return Err(SpendError::UnknownId(id));
    }
    println!("Deleted expense {id}");
    Ok(())
}

fn resolve_id(store: &Store, position: Option<usize>, id: Option<i64>) -> Result<i64> {
    match (position, id) {
        (_, Some(id)) => Ok(id),
        (Some(pos), None) => store
            .id_at_position(pos)?
            .ok_or(SpendError::UnknownPosition(pos)),
        (None, None) => Err(SpendError::Other(
            "Give a list position or --id".to_string(),
        )),
    }
}

pub fn clear(yes: bool) -> Result<()> {
    let store = open_store(&load_settings())?;
    if !yes && !confirm("Are you sure you want to delete all data?") {
        println!("{}", "Cancelled.".yellow());
        return Ok(());
    }
    let removed = store.delete_all()?;
    println!("Deleted {removed} expenses");
    Ok(())
}

pub fn export(output: Option<String>) -> Result<()> {
    let store = open_store(&load_settings())?;
    let expenses = store.fetch_all()?;
    match output {
        Some(path) => {
            let writer = csv::Writer::from_path(&path)?;
            write_csv(writer, &expenses)?;
            println!("Exported {} expenses to {path}", expenses.len());
        }
        None => write_csv(csv::Writer::from_writer(io::stdout().lock()), &expenses)?,
    }
    Ok(())
}

fn write_csv<W: io::Write>(mut writer: csv::Writer<W>, expenses: &[Expense]) -> Result<()> {
    if expenses.is_empty() {
        writer.write_record(["id", "amount", "category", "date", "description"])?;
    }
    for e in expenses {
        writer.serialize(e)?;
    }
    writer.flush()?;
    Ok(())
}
