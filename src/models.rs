use chrono::Local;
use serde::Serialize;

use crate::error::ValidationError;

/// Category suggestions offered by the form when settings don't override them.
pub const DEFAULT_CATEGORIES: &[&str] = &["Food", "Travel", "Shopping", "Bills", "Other"];

/// A stored expense row. `amount` is the text exactly as it was entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expense {
    pub id: i64,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub description: String,
}

impl Expense {
    /// Numeric value of the stored amount, if it still parses to a finite number.
    pub fn amount_value(&self) -> Option<f64> {
        parse_amount(&self.amount).filter(|v| v.is_finite())
    }
}

/// Validated input for `Store::insert`. Built only through [`NewExpense::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub amount: String,
    pub category: String,
    pub date: String,
    pub description: String,
}

impl NewExpense {
    /// Check raw form input. Amount, category and date must be non-empty and
    /// the amount must parse as a number. The strings are kept as typed.
    pub fn parse(
        amount: &str,
        category: &str,
        date: &str,
        description: &str,
    ) -> Result<Self, ValidationError> {
        for (label, value) in [("Amount", amount), ("Category", category), ("Date", date)] {
            if value.is_empty() {
                return Err(ValidationError::MissingField(label));
            }
        }
        if parse_amount(amount).is_none() {
            return Err(ValidationError::NonNumericAmount(amount.to_string()));
        }
        Ok(Self {
            amount: amount.to_string(),
            category: category.to_string(),
            date: date.to_string(),
            description: description.to_string(),
        })
    }
}

/// Surrounding whitespace is ignored, `nan`/`inf`/`infinity` count as numbers,
/// and a single `_` may separate two digits (`1_000`).
fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    if !text.contains('_') {
        return text.parse().ok();
    }
    let bytes = text.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'_' {
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| bytes.get(j));
        let after = bytes.get(i + 1);
        match (before, after) {
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {}
            _ => return None,
        }
    }
    text.replace('_', "").parse().ok()
}

/// Sum of every amount that parses. Rows whose text no longer parses are skipped.
pub fn total(expenses: &[Expense]) -> f64 {
    expenses.iter().filter_map(Expense::amount_value).sum()
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
