use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Row, Table, TableState},
    Frame,
};

use crate::models::{self, Expense};
use crate::tui::{HEADER_STYLE, SELECTED_STYLE};

const HEADERS: [&str; 5] = ["#", "Amount", "Category", "Date", "Description"];

/// One displayed expense. `position` is display-only and recomputed on every
/// load; `id` is what deletes act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub position: usize,
    pub id: i64,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub description: String,
}

#[derive(Default)]
pub struct Grid {
    rows: Vec<GridRow>,
    total: f64,
    selected: Option<usize>,
    table_state: TableState,
}

impl Grid {
    /// Replace every row with `records` and drop the selection.
    pub fn load(&mut self, records: Vec<Expense>) {
        self.total = models::total(&records);
        self.rows = records
            .into_iter()
            .enumerate()
            .map(|(i, e)| GridRow {
                position: i + 1,
                id: e.id,
                amount: e.amount,
                category: e.category,
                date: e.date,
                description: e.description,
            })
            .collect();
        self.selected = None;
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn selected_row(&self) -> Option<&GridRow> {
        self.selected.and_then(|i| self.rows.get(i))
    }

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1).min(self.rows.len() - 1),
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => i.saturating_sub(1),
            None => self.rows.len() - 1,
        });
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .rows()
            .iter()
            .map(|r| {
                Row::new(vec![
                    r.position.to_string(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.date.clone(),
                    r.description.clone(),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(5),
            Constraint::Length(12),
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Fill(1),
        ];

        self.table_state.select(self.selected);
        let table = Table::new(rows, widths)
            .header(Row::new(HEADERS).style(HEADER_STYLE).bottom_margin(1))
            .column_spacing(1)
            .row_highlight_style(SELECTED_STYLE);

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}
