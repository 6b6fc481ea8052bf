use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tracing::{info, warn};

use crate::error::{Result, ValidationError};
use crate::grid::{Grid, GridRow};
use crate::models::{self, NewExpense};
use crate::store::Store;
use crate::tui::{
    self, View, ViewAction, FOCUSED_STYLE, FOOTER_STYLE, HEADER_STYLE, WARNING_STYLE,
};

// Field indices for ExpenseForm::new(); keep in sync with field order
const AMOUNT_IDX: usize = 0;
const CATEGORY_IDX: usize = 1;
const DATE_IDX: usize = 2;
const DESC_IDX: usize = 3;

const FORM_HEIGHT: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Form,
    Grid,
}

enum Screen {
    Main,
    Dialog(Dialog),
    Confirm(Pending),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogKind {
    Info,
    Error,
}

struct Dialog {
    kind: DialogKind,
    message: String,
}

/// Destructive action waiting on a y/n answer.
enum Pending {
    ClearAll,
    Delete(GridRow),
}

impl Pending {
    fn prompt(&self) -> String {
        match self {
            Pending::ClearAll => "Are you sure you want to delete all data?".to_string(),
            Pending::Delete(row) => format!(
                "Delete selected expense #{} ({} {})?",
                row.position, row.amount, row.category
            ),
        }
    }
}

struct ExpenseForm {
    fields: Vec<FormField>,
    focused: usize,
}

struct FormField {
    label: &'static str,
    value: String,
    kind: FieldKind,
}

enum FieldKind {
    Text,
    /// Free text with suggestions cycled by Left/Right.
    Combo { options: Vec<String>, selected: Option<usize> },
}

impl ExpenseForm {
    fn new(categories: &[String]) -> Self {
        Self {
            fields: vec![
                FormField {
                    label: "Amount",
                    value: String::new(),
                    kind: FieldKind::Text,
                },
                FormField {
                    label: "Category",
                    value: String::new(),
                    kind: FieldKind::Combo {
                        options: categories.to_vec(),
                        selected: None,
                    },
                },
                FormField {
                    label: "Date",
                    value: models::today(),
                    kind: FieldKind::Text,
                },
                FormField {
                    label: "Description",
                    value: String::new(),
                    kind: FieldKind::Text,
                },
            ],
            focused: 0,
        }
    }

    /// Clear every field and put today's date back.
    fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
            if let FieldKind::Combo { selected, .. } = &mut field.kind {
                *selected = None;
            }
        }
        self.fields[DATE_IDX].value = models::today();
        self.focused = AMOUNT_IDX;
    }

    fn validate(&self) -> std::result::Result<NewExpense, ValidationError> {
        NewExpense::parse(
            &self.fields[AMOUNT_IDX].value,
            &self.fields[CATEGORY_IDX].value,
            &self.fields[DATE_IDX].value,
            &self.fields[DESC_IDX].value,
        )
    }

    fn cycle_suggestion(&mut self, forward: bool) {
        let field = &mut self.fields[self.focused];
        if let FieldKind::Combo { options, selected } = &mut field.kind {
            if options.is_empty() {
                return;
            }
            let next = match (*selected, forward) {
                (None, true) => 0,
                (None, false) => options.len() - 1,
                (Some(i), true) => (i + 1) % options.len(),
                (Some(0), false) => options.len() - 1,
                (Some(i), false) => i - 1,
            };
            *selected = Some(next);
            field.value = options[next].clone();
        }
    }

    fn push_char(&mut self, c: char) {
        let field = &mut self.fields[self.focused];
        field.value.push(c);
        if let FieldKind::Combo { selected, .. } = &mut field.kind {
            *selected = None;
        }
    }

    fn pop_char(&mut self) {
        let field = &mut self.fields[self.focused];
        field.value.pop();
        if let FieldKind::Combo { selected, .. } = &mut field.kind {
            *selected = None;
        }
    }
}

/// The expense window: entry form on top, grid of stored expenses below.
pub struct ExpenseManager {
    store: Store,
    form: ExpenseForm,
    grid: Grid,
    focus: Focus,
    screen: Screen,
    status_message: Option<String>,
    /// Remaining keypresses before the status message is cleared.
    status_ttl: u8,
}

impl ExpenseManager {
    pub fn new(store: Store, categories: &[String]) -> Result<Self> {
        let mut manager = Self {
            store,
            form: ExpenseForm::new(categories),
            grid: Grid::default(),
            focus: Focus::Form,
            screen: Screen::Main,
            status_message: None,
            status_ttl: 0,
        };
        manager.reload()?;
        Ok(manager)
    }

    /// Refill the grid from the store.
    pub fn reload(&mut self) -> Result<()> {
        let records = self.store.fetch_all()?;
        self.grid.load(records);
        Ok(())
    }

    fn submit(&mut self) {
        let expense = match self.form.validate() {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "expense rejected");
                self.show_dialog(DialogKind::Error, e.to_string());
                return;
            }
        };
        if let Err(e) = self.store.insert(&expense) {
            self.show_dialog(DialogKind::Error, e.to_string());
            return;
        }
        self.form.reset();
        match self.reload() {
            Ok(()) => self.show_dialog(DialogKind::Info, "Expense added successfully".into()),
            Err(e) => self.show_dialog(DialogKind::Error, e.to_string()),
        }
    }

    fn request_clear_all(&mut self) {
        self.screen = Screen::Confirm(Pending::ClearAll);
    }

    fn request_delete_selected(&mut self) {
        match self.grid.selected_row() {
            Some(row) => self.screen = Screen::Confirm(Pending::Delete(row.clone())),
            None => self.set_status("Select a record first".into()),
        }
    }

    fn clear_all(&mut self) {
        let outcome = self.store.delete_all().and_then(|removed| {
            self.reload()?;
            Ok(removed)
        });
        match outcome {
            Ok(removed) => {
                info!(removed, "cleared from form");
                self.set_status(format!("Deleted {removed} expenses"));
            }
            Err(e) => self.show_dialog(DialogKind::Error, e.to_string()),
        }
    }

    fn delete_row(&mut self, row: &GridRow) {
        let outcome = self.store.delete_by_id(row.id).and_then(|removed| {
            self.reload()?;
            Ok(removed)
        });
        match outcome {
            Ok(true) => self.set_status(format!("Deleted expense #{}", row.position)),
            Ok(false) => self.set_status("Expense was already gone".into()),
            Err(e) => self.show_dialog(DialogKind::Error, e.to_string()),
        }
    }

    fn show_dialog(&mut self, kind: DialogKind, message: String) {
        self.screen = Screen::Dialog(Dialog { kind, message });
    }

    fn set_status(&mut self, msg: String) {
        self.status_message = Some(msg);
        self.status_ttl = 3;
    }

    fn handle_main_key(&mut self, code: KeyCode) -> ViewAction {
        match self.focus {
            Focus::Form => self.handle_form_key(code),
            Focus::Grid => self.handle_grid_key(code),
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) -> ViewAction {
        use KeyCode::*;
        match code {
            Tab | Down => {
                if self.form.focused + 1 == self.form.fields.len() {
                    self.focus = Focus::Grid;
                } else {
                    self.form.focused += 1;
                }
            }
            BackTab | Up => {
                self.form.focused = self.form.focused.saturating_sub(1);
            }
            Left => self.form.cycle_suggestion(false),
            Right => self.form.cycle_suggestion(true),
            Char(c) => self.form.push_char(c),
            Backspace => self.form.pop_char(),
            Enter => self.submit(),
            Delete => self.request_delete_selected(),
            Esc => self.focus = Focus::Grid,
            _ => {}
        }
        ViewAction::Continue
    }

    fn handle_grid_key(&mut self, code: KeyCode) -> ViewAction {
        use KeyCode::*;
        match code {
            Up => self.grid.select_prev(),
            Down => self.grid.select_next(),
            Char(' ') => self.grid.clear_selection(),
            Char('d') | Delete => self.request_delete_selected(),
            Char('c') => self.request_clear_all(),
            Char('a') | Tab => {
                self.focus = Focus::Form;
                self.form.focused = AMOUNT_IDX;
            }
            BackTab => {
                self.focus = Focus::Form;
                self.form.focused = DESC_IDX;
            }
            Char('q') | Esc => return ViewAction::Close,
            _ => {}
        }
        ViewAction::Continue
    }

    fn handle_dialog_key(&mut self, code: KeyCode) {
        if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            self.screen = Screen::Main;
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let pending = std::mem::replace(&mut self.screen, Screen::Main);
                match pending {
                    Screen::Confirm(Pending::ClearAll) => self.clear_all(),
                    Screen::Confirm(Pending::Delete(row)) => self.delete_row(&row),
                    _ => {}
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.screen = Screen::Main;
            }
            _ => {}
        }
    }

    fn draw_main(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let border_style = Style::default().fg(Color::DarkGray);

        let [header_area, sep, form_area, grid_area, total_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(FORM_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(" Expense Tracker").style(HEADER_STYLE),
            header_area,
        );

        let sep_line = "━".repeat(area.width as usize);
        frame.render_widget(Paragraph::new(sep_line.as_str()).style(border_style), sep);

        self.draw_form(frame, form_area);

        let grid_border = if self.focus == Focus::Grid {
            FOCUSED_STYLE
        } else {
            border_style
        };
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(grid_border)
            .title(format!(" Expenses ({}) ", self.grid.len()));
        let inner = block.inner(grid_area);
        frame.render_widget(block, grid_area);
        if self.grid.is_empty() {
            frame.render_widget(
                Paragraph::new("   No expenses yet. Fill in the form and press Enter."),
                inner,
            );
        } else {
            self.grid.render(frame, inner);
        }

        frame.render_widget(
            Paragraph::new(format!(" Total: {}", crate::fmt::money(self.grid.total())))
                .style(Style::default().add_modifier(Modifier::BOLD)),
            total_area,
        );

        let hints = match (&self.status_message, self.focus) {
            (Some(msg), _) => Paragraph::new(format!(" {msg}")).style(WARNING_STYLE),
            (None, Focus::Form) => Paragraph::new(
                " Tab=next field  \u{2190}/\u{2192}=category  Enter=add  Esc=grid  Ctrl-C=quit",
            )
            .style(FOOTER_STYLE),
            (None, Focus::Grid) => Paragraph::new(
                " \u{2191}/\u{2193}=select  d=delete selected  c=clear all  a=add  q=quit",
            )
            .style(FOOTER_STYLE),
        };
        frame.render_widget(hints, hints_area);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![Line::from("")];
        for (i, field) in self.form.fields.iter().enumerate() {
            let is_focused = self.focus == Focus::Form && i == self.form.focused;
            let label_style = if is_focused {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let value_style = if is_focused { FOCUSED_STYLE } else { Style::default() };
            let cursor = if is_focused { "_" } else { "" };

            let mut spans = vec![
                Span::styled(format!("   {:<14} ", field.label), label_style),
                Span::styled(format!("{}{cursor}", field.value), value_style),
            ];
            if let (FieldKind::Combo { options, .. }, true) = (&field.kind, is_focused) {
                spans.push(Span::styled(
                    format!("   < {} >", options.join(" | ")),
                    FOOTER_STYLE,
                ));
            }
            lines.push(Line::from(spans));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_popup(&self, frame: &mut Frame, title: &str, color: Color, body: &str, hint: &str) {
        let width = popup_width(body);
        let rect = tui::centered(frame.area(), width, 6);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(
                Line::from(Span::styled(
                    format!(" {title} "),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
            );
        let lines = vec![
            Line::from(""),
            Line::from(body.to_string()),
            Line::from(Span::styled(hint.to_string(), FOOTER_STYLE)),
        ];
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(lines).block(block).alignment(Alignment::Center),
            rect,
        );
    }
}

impl View for ExpenseManager {
    fn draw(&mut self, frame: &mut Frame) {
        self.draw_main(frame);
        match &self.screen {
            Screen::Main => {}
            Screen::Dialog(dialog) => {
                let (title, color) = match dialog.kind {
                    DialogKind::Info => ("Success", Color::Green),
                    DialogKind::Error => ("Error", Color::Red),
                };
                self.draw_popup(frame, title, color, &dialog.message, "Enter=ok");
            }
            Screen::Confirm(pending) => {
                self.draw_popup(frame, "Confirm", Color::Yellow, &pending.prompt(), "y=yes  n=no");
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        if self.status_ttl > 0 {
            self.status_ttl -= 1;
            if self.status_ttl == 0 {
                self.status_message = None;
            }
        }

        match self.screen {
            Screen::Main => return self.handle_main_key(code),
            Screen::Dialog(_) => self.handle_dialog_key(code),
            Screen::Confirm(_) => self.handle_confirm_key(code),
        }
        ViewAction::Continue
    }
}

/// Box width for a popup message: padded text, at least 36 columns.
fn popup_width(body: &str) -> u16 {
    u16::try_from(body.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(6)
        .max(36)
}

/// Open the expense window on the configured data directory.
pub fn run() -> Result<()> {
    let settings = crate::settings::load_settings();
    let store = super::open_store(&settings)?;
    let mut manager = ExpenseManager::new(store, &settings.categories)?;
    tui::run_view(&mut manager)
}
