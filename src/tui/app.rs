//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the planner session,
//! translates key presses into planner actions, renders the task list and
//! forms, and coordinates between screens (list, add, edit, help, confirm).

use std::io;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::debug;
use uuid::Uuid;

use crate::dates::{format_created, format_due_relative, parse_due_input};
use crate::display::{done_marker, format_filter, format_priority, format_sort, truncate};
use crate::planner::{Action, Change};
use crate::session::Session;
use crate::store::Storage;
use crate::task::Draft;
use crate::tui::{
    colors::{priority_color, DARK_RED, GOLD, MUTED},
    enums::{AppState, InputMode},
    task_form::{TaskForm, DESCRIPTION_ORDER, DUE_ORDER, PRIORITY_ORDER, TITLE_ORDER},
    utils::centered_rect,
};

/// Main application state for the terminal user interface.
pub struct App<S: Storage> {
    state: AppState,
    session: Session<S>,
    task_list_state: TableState,
    visible_tasks: Vec<Uuid>,
    task_form: TaskForm,
    input_mode: InputMode,
    status_message: String,
    search_active: bool,
    confirm_target: Option<Uuid>,
}

impl<S: Storage> App<S> {
    pub fn new(session: Session<S>) -> Self {
        let task_form = TaskForm::from_draft(&session.planner.form);
        let mut app = App {
            state: AppState::TaskList,
            session,
            task_list_state: TableState::default(),
            visible_tasks: Vec::new(),
            task_form,
            input_mode: InputMode::None,
            status_message: String::new(),
            search_active: false,
            confirm_target: None,
        };
        app.update_visible_tasks();
        app
    }

    /// Recompute the visible list, keeping the selection on the same task when possible.
    fn update_visible_tasks(&mut self) {
        let old_selected_id = self.selected_task_id();

        self.visible_tasks = self.session.planner.visible().iter().map(|t| t.id).collect();

        let restored = old_selected_id
            .and_then(|old| self.visible_tasks.iter().position(|&id| id == old));
        let selection = match restored {
            Some(idx) => Some(idx),
            None if self.visible_tasks.is_empty() => None,
            None => Some(
                self.task_list_state
                    .selected()
                    .unwrap_or(0)
                    .min(self.visible_tasks.len() - 1),
            ),
        };
        self.task_list_state.select(selection);
    }

    fn selected_task_id(&self) -> Option<Uuid> {
        self.task_list_state
            .selected()
            .and_then(|idx| self.visible_tasks.get(idx))
            .copied()
    }

    /// Apply an action to the session and refresh the visible list.
    fn dispatch(&mut self, action: Action) -> Change {
        let change = self.session.dispatch(action);
        self.update_visible_tasks();
        change
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    fn open_add_form(&mut self) {
        self.task_form = TaskForm::from_draft(&self.session.planner.form);
        self.state = AppState::AddTask;
        self.input_mode = InputMode::Text;
    }

    fn open_edit_form(&mut self, task_id: Uuid) {
        self.dispatch(Action::StartEdit(task_id));
        if let Some(session) = &self.session.planner.active_edit {
            self.task_form = TaskForm::from_draft(&session.draft);
            self.state = AppState::EditTask;
            self.input_mode = InputMode::Text;
        }
    }

    fn close_form(&mut self) {
        self.state = AppState::TaskList;
        self.input_mode = InputMode::None;
    }

    /// Why a draft would be rejected, if it would be.
    fn draft_problem(draft: &Draft) -> Option<&'static str> {
        if draft.title.trim().is_empty() {
            Some("Title is required")
        } else if !draft.due.trim().is_empty() && parse_due_input(&draft.due).is_none() {
            Some("Unrecognised due date. Use YYYY-MM-DD, 'today', 'tomorrow', or 'in Nd'.")
        } else {
            None
        }
    }

    fn submit_add(&mut self) {
        let draft = self.task_form.to_draft();
        let problem = Self::draft_problem(&draft);
        self.session.planner.form = draft;
        if self.dispatch(Action::Add).needs_save() {
            self.task_form = TaskForm::from_draft(&self.session.planner.form);
            if let Some(pos) = self.session.planner.tasks.first()
                .and_then(|t| self.visible_tasks.iter().position(|&id| id == t.id))
            {
                self.task_list_state.select(Some(pos));
            }
            self.close_form();
            self.set_status_message("Task created");
        } else {
            self.set_status_message(problem.unwrap_or("Task not created"));
        }
    }

    fn submit_edit(&mut self) {
        let Some(task_id) = self.session.planner.editing_id() else {
            self.close_form();
            return;
        };
        let draft = self.task_form.to_draft();
        let kept_due = !draft.due.trim().is_empty() && parse_due_input(&draft.due).is_none();
        if let Some(d) = self.session.planner.draft_mut() {
            *d = draft;
        }
        self.dispatch(Action::SaveEdit(task_id));
        self.close_form();
        self.set_status_message(if kept_due {
            "Task updated (unrecognised due date ignored)"
        } else {
            "Task updated"
        });
    }

    fn move_selection(&mut self, down: bool) {
        if self.visible_tasks.is_empty() {
            return;
        }
        let last = self.visible_tasks.len() - 1;
        let next = match self.task_list_state.selected() {
            Some(i) if down => (i + 1).min(last),
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.task_list_state.select(Some(next));
    }

    /// Keys while typing a search query. The list updates as the query changes.
    fn handle_search_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.search_active = false;
                self.input_mode = InputMode::None;
                self.dispatch(Action::SetQuery(String::new()));
            }
            KeyCode::Enter => {
                self.search_active = false;
                self.input_mode = InputMode::None;
                if self.session.planner.view.query.is_empty() {
                    self.set_status_message("Search cleared");
                } else {
                    self.set_status_message(format!(
                        "Search applied: '{}' ({} tasks)",
                        self.session.planner.view.query,
                        self.visible_tasks.len()
                    ));
                }
            }
            KeyCode::Backspace => {
                let mut q = self.session.planner.view.query.clone();
                if q.pop().is_some() {
                    self.dispatch(Action::SetQuery(q));
                }
            }
            KeyCode::Char(c) => {
                let mut q = self.session.planner.view.query.clone();
                q.push(c);
                self.dispatch(Action::SetQuery(q));
            }
            _ => {}
        }
    }

    /// Handle keyboard input when in the task list view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if self.search_active {
            self.handle_search_input(key);
            return false;
        }

        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.session.planner.view.query.is_empty() {
                    return true;
                }
                self.dispatch(Action::SetQuery(String::new()));
                self.set_status_message("Search cleared");
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                if let Some(id) = self.selected_task_id() {
                    self.dispatch(Action::Toggle(id));
                    if let Some(t) = self.session.planner.get(id) {
                        let msg = if t.done { "Marked done" } else { "Marked open" };
                        self.set_status_message(msg);
                    }
                }
            }
            KeyCode::Char('a') => self.open_add_form(),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_task_id() {
                    self.open_edit_form(id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_task_id() {
                    self.confirm_target = Some(id);
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('/') => {
                self.search_active = true;
                self.input_mode = InputMode::Text;
                self.set_status_message("Search: type to filter title/description, Enter to keep, Esc to clear");
            }
            KeyCode::Char('f') => {
                let next = self.session.planner.view.filter.cycle();
                self.dispatch(Action::SetFilter(next));
                self.set_status_message(format!(
                    "Showing {} ({} tasks)",
                    format_filter(next),
                    self.visible_tasks.len()
                ));
            }
            KeyCode::Char('s') => {
                let next = self.session.planner.view.sort.by.cycle();
                self.dispatch(Action::SetSortBy(next));
                self.set_status_message(format!("Sort: {}", format_sort(self.session.planner.view.sort)));
            }
            KeyCode::Char('o') => {
                self.dispatch(Action::ToggleSortDir);
                self.set_status_message(format!("Sort: {}", format_sort(self.session.planner.view.sort)));
            }
            KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    /// Handle keyboard input in the add and edit forms.
    fn handle_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers, is_edit: bool) -> bool {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Esc => {
                if is_edit {
                    self.dispatch(Action::CancelEdit);
                    self.set_status_message("Edit cancelled");
                } else {
                    // Keep what was typed for next time.
                    self.session.planner.form = self.task_form.to_draft();
                }
                self.close_form();
            }
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Home => self.task_form.handle_home_end(false),
            KeyCode::End => self.task_form.handle_home_end(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => {
                if is_edit {
                    self.submit_edit();
                } else {
                    self.submit_add();
                }
            }
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
        false
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(id) = self.confirm_target.take() {
                    if self.dispatch(Action::Remove(id)).needs_save() {
                        self.set_status_message("Task deleted");
                    }
                }
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_target = None;
                self.state = AppState::TaskList;
            }
            _ => {}
        }
    }

    /// Route one key press to the current screen. Returns true to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.clear_status_message();
        debug!(code = ?key.code, state = ?self.state, "key");
        match self.state {
            AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers),
            AppState::AddTask => self.handle_form_input(key.code, key.modifiers, false),
            AppState::EditTask => self.handle_form_input(key.code, key.modifiers, true),
            AppState::Help => {
                self.state = AppState::TaskList;
                false
            }
            AppState::Confirm => {
                self.handle_confirm_input(key.code);
                false
            }
        }
    }

    /// Poll for and handle one keyboard event.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }
        Ok(false)
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let view = &self.session.planner.view;
        let query = if view.query.is_empty() && !self.search_active {
            "-".to_string()
        } else {
            view.query.clone()
        };
        let text = vec![Line::from(vec![
            Span::styled("POCKET PLANNER", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!(
                    "Search: {}  Filter: {}  Sort: {}",
                    query,
                    format_filter(view.filter),
                    format_sort(view.sort)
                ),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];
        let header = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    /// Render the main task list view with header and completion gauge.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // header
                Constraint::Min(0),    // table
                Constraint::Length(3), // completion
            ])
            .split(area);

        self.render_header(f, chunks[0]);

        let title = format!(
            "Tasks ({}/{}) - Press 'h' for help",
            self.visible_tasks.len(),
            self.session.planner.tasks.len()
        );

        if self.visible_tasks.is_empty() {
            let empty = Paragraph::new("No tasks yet.")
                .block(Block::default().borders(Borders::ALL).title(title))
                .alignment(Alignment::Center)
                .style(Style::default().fg(MUTED));
            f.render_widget(empty, chunks[1]);
        } else {
            let today = Local::now().date_naive();
            let header = Row::new(["", "Title", "Priority", "Due", "Added"].map(|h| {
                Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
            }))
            .style(Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20)))
            .height(1);

            let rows: Vec<Row> = self
                .visible_tasks
                .iter()
                .filter_map(|&id| self.session.planner.get(id))
                .map(|task| {
                    let style = if task.done {
                        Style::default().fg(MUTED).add_modifier(Modifier::CROSSED_OUT)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    let mut title_spans = vec![Span::raw(task.title.clone())];
                    if let Some(first_line) = task.description.lines().next() {
                        title_spans.push(Span::styled(
                            format!("  {}", truncate(first_line, 40)),
                            Style::default().fg(MUTED),
                        ));
                    }
                    let due = match task.due {
                        Some(d) => format!("{} ({})", d, format_due_relative(Some(d), today)),
                        None => "-".into(),
                    };
                    Row::new(vec![
                        Cell::from(done_marker(task.done)),
                        Cell::from(Line::from(title_spans)),
                        Cell::from(format_priority(task.priority))
                            .style(Style::default().bg(priority_color(task.priority)).fg(Color::White)),
                        Cell::from(due),
                        Cell::from(format_created(task.created_at)),
                    ])
                    .style(style)
                })
                .collect();

            let widths = [
                Constraint::Length(2),  // done
                Constraint::Min(25),    // title
                Constraint::Length(9),  // priority
                Constraint::Length(22), // due
                Constraint::Length(17), // added
            ];

            let table = Table::new(rows, widths)
                .header(header)
                .block(Block::default().borders(Borders::ALL).title(title))
                .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
                .highlight_symbol(">> ");
            f.render_stateful_widget(table, chunks[1], &mut self.task_list_state);
        }

        let completion = self.session.planner.completion();
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Completion"))
            .gauge_style(Style::default().fg(GOLD).bg(Color::Black))
            .percent(completion as u16)
            .label(format!("{completion}% done"));
        f.render_widget(gauge, chunks[2]);
    }

    /// Render the add or edit form.
    fn render_task_form(&mut self, f: &mut Frame, area: Rect, is_edit: bool) {
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(if is_edit { "Edit Task" } else { "Add Task" });
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // title
                Constraint::Length(3), // description
                Constraint::Length(3), // due
                Constraint::Length(3), // priority
                Constraint::Min(1),    // instructions
            ])
            .split(inner);

        let focus = |field: usize| {
            if self.task_form.current_field == field {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            }
        };

        let inputs = [
            (TITLE_ORDER, "Title *", &self.task_form.title),
            (DESCRIPTION_ORDER, "Description", &self.task_form.description),
            (DUE_ORDER, "Due (YYYY-MM-DD, today, fri, in 3d...)", &self.task_form.due),
        ];
        for (order, label, field) in inputs {
            let border = if field.active { Style::default().fg(GOLD) } else { Style::default() };
            let widget = Paragraph::new(field.value.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(label)
                    .border_style(border),
            );
            f.render_widget(widget, chunks[order]);
        }

        let priority = self.task_form.selected_priority();
        let selector = Paragraph::new(Line::from(vec![
            Span::raw("< "),
            Span::styled(
                format!(" {} ", format_priority(priority)),
                Style::default().bg(priority_color(priority)).fg(Color::White),
            ),
            Span::raw(" >"),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Priority")
                .border_style(focus(PRIORITY_ORDER)),
        );
        f.render_widget(selector, chunks[PRIORITY_ORDER]);

        let instructions = Paragraph::new(vec![
            Line::from("Tab/↑/↓ move between fields   ←/→ move cursor or change priority"),
            Line::from(if is_edit {
                "Enter save   Esc cancel (a blank title keeps the current one)"
            } else {
                "Enter add task   Esc back to list (input is kept)"
            }),
        ])
        .style(Style::default().fg(MUTED))
        .wrap(Wrap { trim: true });
        f.render_widget(instructions, chunks[4]);

        let active = match self.task_form.current_field {
            TITLE_ORDER => Some(&self.task_form.title),
            DESCRIPTION_ORDER => Some(&self.task_form.description),
            DUE_ORDER => Some(&self.task_form.due),
            _ => None,
        };
        if let Some(field) = active {
            let rect = chunks[self.task_form.current_field];
            let max_x = rect.width.saturating_sub(2) as usize;
            f.set_cursor_position((
                rect.x + 1 + field.cursor.min(max_x) as u16,
                rect.y + 1,
            ));
        }
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(Span::styled("Pocket Planner Help", bold)),
            Line::from(""),
            Line::from(Span::styled("Task List:", bold)),
            Line::from("  ↑/↓, k/j     Select task"),
            Line::from("  Space/x      Toggle done"),
            Line::from("  a            Add new task"),
            Line::from("  e/Enter      Edit selected task"),
            Line::from("  d            Delete selected task"),
            Line::from("  /            Search title and description"),
            Line::from("  f            Cycle filter (All → Open → Done)"),
            Line::from("  s            Cycle sort (Created → Due date → Priority)"),
            Line::from("  o            Flip sort direction"),
            Line::from("  h/F1         Show this help"),
            Line::from("  q/Esc/Ctrl+C Quit"),
            Line::from(""),
            Line::from(Span::styled("Forms:", bold)),
            Line::from("  Tab/↑/↓      Move between fields"),
            Line::from("  ←/→          Move cursor, or change priority"),
            Line::from("  Enter        Add / Save"),
            Line::from("  Esc          Back / Cancel edit"),
            Line::from(""),
            Line::from(Span::styled("Due Date Formats:", bold)),
            Line::from("  YYYY-MM-DD   Specific date (e.g., 2024-12-25)"),
            Line::from("  today        Today's date"),
            Line::from("  tomorrow     Tomorrow's date"),
            Line::from("  fri          This coming Friday (next fri for the week after)"),
            Line::from("  in 3d        3 days from today (also 2w, 1m)"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render a confirmation dialog for deletion.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let title = self
            .confirm_target
            .and_then(|id| self.session.planner.get(id))
            .map(|t| t.title.clone())
            .unwrap_or_default();
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("Delete this task?", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(truncate(&title, 40)),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.search_active && self.input_mode == InputMode::Text {
            format!(
                "Search: {}_ (Esc to clear, Enter to keep)",
                self.session.planner.view.query
            )
        } else {
            match self.state {
                AppState::TaskList => format!(
                    "Tasks: {} shown | {}% done | Press 'h' for help",
                    self.visible_tasks.len(),
                    self.session.planner.completion()
                ),
                AppState::AddTask => "Add New Task".to_string(),
                AppState::EditTask => "Edit Task".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Delete".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20)))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to the current screen.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[0]),
            AppState::AddTask => self.render_task_form(f, chunks[0], false),
            AppState::EditTask => self.render_task_form(f, chunks[0], true),
            AppState::Help => self.render_help(f, chunks[0]),
            AppState::Confirm => {
                self.render_task_list(f, chunks[0]);
                self.render_confirm(f, chunks[0]);
            }
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop: render, then handle input, until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FilterMode, Priority};
    use crate::store::MemoryStorage;
    use ratatui::backend::TestBackend;

    fn app() -> App<MemoryStorage> {
        App::new(Session::open(MemoryStorage::new(), "pp_tasks"))
    }

    fn press(app: &mut App<MemoryStorage>, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App<MemoryStorage>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add_task(app: &mut App<MemoryStorage>, title: &str) {
        press(app, KeyCode::Char('a'));
        type_text(app, title);
        press(app, KeyCode::Enter);
    }

    fn screen_text(app: &mut App<MemoryStorage>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_add_through_form_prepends_and_persists() {
        let mut app = app();
        add_task(&mut app, "Buy milk");
        add_task(&mut app, "File taxes");
        assert_eq!(app.state, AppState::TaskList);
        let titles: Vec<&str> = app.session.planner.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["File taxes", "Buy milk"]);
        let stored = app.session.store().storage().get_item("pp_tasks").unwrap().unwrap();
        assert!(stored.contains("File taxes"));
    }

    #[test]
    fn test_blank_title_keeps_form_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::AddTask);
        assert!(app.session.planner.tasks.is_empty());
    }

    #[test]
    fn test_edit_then_cancel_leaves_task() {
        let mut app = app();
        add_task(&mut app, "Original");
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state, AppState::EditTask);
        type_text(&mut app, " changed");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session.planner.tasks[0].title, "Original");
        assert!(app.session.planner.active_edit.is_none());
    }

    #[test]
    fn test_edit_saves_priority_change() {
        let mut app = app();
        add_task(&mut app, "Call bank");
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.planner.tasks[0].priority, Priority::High);
    }

    #[test]
    fn test_toggle_delete_and_filter() {
        let mut app = app();
        add_task(&mut app, "One");
        add_task(&mut app, "Two");
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.session.planner.view.filter, FilterMode::Done);
        assert_eq!(app.visible_tasks.len(), 1);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.state, AppState::Confirm);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.session.planner.tasks.len(), 1);
        assert!(app.visible_tasks.is_empty());
        assert!(screen_text(&mut app).contains("No tasks yet."));
    }

    #[test]
    fn test_search_updates_live_and_esc_clears() {
        let mut app = app();
        add_task(&mut app, "Water plants");
        add_task(&mut app, "Buy milk");
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "MILK");
        assert_eq!(app.visible_tasks.len(), 1);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.planner.view.query, "MILK");
        assert_eq!(app.visible_tasks.len(), 1);

        // Esc in the list clears a kept query before it quits.
        assert!(!press(&mut app, KeyCode::Esc));
        assert_eq!(app.visible_tasks.len(), 2);

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "water");
        press(&mut app, KeyCode::Esc);
        assert!(app.session.planner.view.query.is_empty());
        assert!(press(&mut app, KeyCode::Esc));
    }

    #[test]
    fn test_renders_completion_and_rows() {
        let mut app = app();
        add_task(&mut app, "Alpha");
        add_task(&mut app, "Bravo");
        press(&mut app, KeyCode::Char('x'));
        let text = screen_text(&mut app);
        assert!(text.contains("Alpha"));
        assert!(text.contains("Bravo"));
        assert!(text.contains("50% done"));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }
}
