use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::backup::Backup;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::models::{Expense, NewExpense};

/// Handle to the expenses database file. Every operation opens its own
/// connection and drops it before returning.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        get_connection(&self.path)
    }

    /// Create the parent directory, database file and table if missing.
    pub fn initialize(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = self.connect()?;
        init_db(&conn)?;
        debug!(path = %self.path.display(), "store initialized");
        Ok(())
    }

    pub fn insert(&self, expense: &NewExpense) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO expenses (amount, category, date, description) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                expense.amount,
                expense.category,
                expense.date,
                expense.description
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!(id, amount = %expense.amount, category = %expense.category, "expense inserted");
        Ok(id)
    }

    /// All expenses in id (insertion) order.
    pub fn fetch_all(&self) -> Result<Vec<Expense>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, amount, category, date, description FROM expenses ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Expense {
                    id: row.get(0)?,
                    amount: row.get(1)?,
                    category: row.get(2)?,
                    date: row.get(3)?,
                    description: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(count = rows.len(), "expenses fetched");
        Ok(rows)
    }

    pub fn fetch_ids(&self) -> Result<Vec<i64>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id FROM expenses ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    /// Resolve a 1-based display position (as printed by `list`) to an id.
    pub fn id_at_position(&self, position: usize) -> Result<Option<i64>> {
        if position == 0 {
            return Ok(None);
        }
        Ok(self.fetch_ids()?.get(position - 1).copied())
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.connect()?;
        let count = conn.query_row("SELECT count(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Returns true if a row was removed. A missing id is not an error.
    pub fn delete_by_id(&self, id: i64) -> Result<bool> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM expenses WHERE id = ?1", [id])?;
        info!(id, removed, "delete by id");
        Ok(removed > 0)
    }

    pub fn delete_all(&self) -> Result<usize> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM expenses", [])?;
        info!(removed, "all expenses deleted");
        Ok(removed)
    }

    /// Copy the live database to `dest` with SQLite's online backup.
    pub fn backup_to(&self, dest: &Path) -> Result<()> {
        let conn = self.connect()?;
        let mut dest_conn = Connection::open(dest)?;
        let backup = Backup::new(&conn, &mut dest_conn)?;
        backup.run_to_completion(100, Duration::from_millis(10), None)?;
        info!(dest = %dest.display(), "backup written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("data").join("expenses.db"));
        store.initialize().unwrap();
        (dir, store)
    }

    fn new_expense(amount: &str, category: &str) -> NewExpense {
        NewExpense::parse(amount, category, "2024-01-01", "").unwrap()
    }

    #[test]
    fn test_initialize_creates_parent_dir_and_is_idempotent() {
        let (_dir, store) = test_store();
        assert!(store.path().exists());
        store.insert(&new_expense("1", "Food")).unwrap();
        store.initialize().unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_insert_round_trips_values() {
        let (_dir, store) = test_store();
        let input = NewExpense::parse("12.50", "Food", "2024-01-01", "lunch").unwrap();
        let id = store.insert(&input).unwrap();
        let rows = store.fetch_all().unwrap();
        assert_eq!(
            rows,
            vec![Expense {
                id,
                amount: "12.50".into(),
                category: "Food".into(),
                date: "2024-01-01".into(),
                description: "lunch".into(),
            }]
        );
    }

    #[test]
    fn test_fetch_all_in_insertion_order() {
        let (_dir, store) = test_store();
        for cat in ["Food", "Travel", "Bills"] {
            store.insert(&new_expense("1", cat)).unwrap();
        }
        let cats: Vec<String> = store.fetch_all().unwrap().into_iter().map(|e| e.category).collect();
        assert_eq!(cats, vec!["Food", "Travel", "Bills"]);
    }

    #[test]
    fn test_delete_by_id_removes_one() {
        let (_dir, store) = test_store();
        let a = store.insert(&new_expense("1", "Food")).unwrap();
        let b = store.insert(&new_expense("2", "Travel")).unwrap();
        assert!(store.delete_by_id(a).unwrap());
        let ids = store.fetch_ids().unwrap();
        assert_eq!(ids, vec![b]);
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let (_dir, store) = test_store();
        store.insert(&new_expense("1", "Food")).unwrap();
        assert!(!store.delete_by_id(999).unwrap());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_delete_all_then_ids_not_reused() {
        let (_dir, store) = test_store();
        store.insert(&new_expense("1", "Food")).unwrap();
        let last = store.insert(&new_expense("2", "Food")).unwrap();
        assert_eq!(store.delete_all().unwrap(), 2);
        assert!(store.fetch_all().unwrap().is_empty());
        let next = store.insert(&new_expense("3", "Food")).unwrap();
        assert!(next > last, "id {next} reused (last was {last})");
    }

    #[test]
    fn test_delete_all_on_empty_store() {
        let (_dir, store) = test_store();
        assert_eq!(store.delete_all().unwrap(), 0);
    }

    #[test]
    fn test_id_at_position() {
        let (_dir, store) = test_store();
        let a = store.insert(&new_expense("1", "Food")).unwrap();
        let b = store.insert(&new_expense("2", "Food")).unwrap();
        store.delete_by_id(a).unwrap();
        let c = store.insert(&new_expense("3", "Food")).unwrap();
        assert_eq!(store.id_at_position(1).unwrap(), Some(b));
        assert_eq!(store.id_at_position(2).unwrap(), Some(c));
        assert_eq!(store.id_at_position(3).unwrap(), None);
        assert_eq!(store.id_at_position(0).unwrap(), None);
    }

    #[test]
    fn test_backup_copies_rows() {
        let (dir, store) = test_store();
        store.insert(&new_expense("9.99", "Shopping")).unwrap();
        let dest = dir.path().join("copy.db");
        store.backup_to(&dest).unwrap();
        let copy = Store::new(&dest);
        let rows = copy.fetch_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, "9.99");
    }
}
