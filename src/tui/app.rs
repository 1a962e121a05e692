use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::warn;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::config::AppConfig;
use crate::engine::dates::{format_date, DayRange};
use crate::models::{ChartsReport, HabitWithStats, NewHabit, StatsSummary};
use crate::store::HabitStore;
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{categories, habits, header, statusbar, streak, weekly};
use crate::utils::format::rate_bar;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Stats,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    AddHabit,
    ConfirmDelete,
}

pub struct App {
    pub view: View,
    pub focus_idx: usize,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub input_error: Option<String>,
    /// Last failed action, shown in place of the key hints
    pub status: Option<String>,

    pub fixed_today: Option<NaiveDate>,
    pub week_days: u32,
    pub window_days: u32,

    // Snapshot (refreshed after every write and on date change)
    pub today: NaiveDate,
    pub habits: Vec<HabitWithStats>,
    pub stats: StatsSummary,
    pub charts: ChartsReport,
}

impl App {
    pub fn new(config: &AppConfig, fixed_today: Option<NaiveDate>) -> Self {
        App {
            view: View::Dashboard,
            focus_idx: 0,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            input_error: None,
            status: None,
            fixed_today,
            week_days: config.dashboard.week_days,
            window_days: config.stats.window_days,
            today: fixed_today.unwrap_or_else(|| Local::now().date_naive()),
            habits: Vec::new(),
            stats: StatsSummary::default(),
            charts: ChartsReport::default(),
        }
    }

    fn current_day(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn load(&mut self, store: &HabitStore) -> Result<()> {
        self.today = self.current_day();
        self.window_days = store.window_days();
        self.habits = store.get_habits(self.today)?;
        self.stats = store.stats(self.today)?;
        self.charts = store.charts(self.today, DayRange::default())?;
        if self.focus_idx >= self.habits.len() {
            self.focus_idx = self.habits.len().saturating_sub(1);
        }
        Ok(())
    }

    /// Reload when the calendar day rolls over.
    pub fn tick(&mut self, store: &HabitStore) {
        if self.current_day() != self.today {
            self.reload(store);
        }
    }

    fn reload(&mut self, store: &HabitStore) {
        if let Err(e) = self.load(store) {
            warn!("dashboard reload failed: {}", e);
            self.status = Some(format!("✗ {}", e));
        }
    }

    pub fn focused(&self) -> Option<&HabitWithStats> {
        self.habits.get(self.focus_idx)
    }

    pub fn done_today(&self) -> usize {
        self.habits
            .iter()
            .filter(|h| {
                h.completions
                    .iter()
                    .find(|c| c.date == self.today)
                    .is_some_and(|c| c.completed)
            })
            .count()
    }

    pub fn handle_key(&mut self, key: KeyEvent, store: &HabitStore) {
        // Some terminals also report release and repeat events
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.input_mode {
            InputMode::AddHabit => self.handle_add_input(key, store),
            InputMode::ConfirmDelete => self.handle_confirm_delete(key, store),
            InputMode::Normal => match self.view {
                View::Dashboard => self.handle_dashboard_key(key, store),
                View::Stats => {
                    if matches!(key.code, KeyCode::Esc | KeyCode::Char('s')) {
                        self.view = View::Dashboard;
                    }
                }
                View::Help => {
                    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                        self.view = View::Dashboard;
                    }
                }
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent, store: &HabitStore) {
        self.status = None;
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Char('s') => {
                self.view = View::Stats;
            }
            KeyCode::Char('a') => {
                self.input_mode = InputMode::AddHabit;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Char('D') => {
                if self.focused().is_some() {
                    self.input_mode = InputMode::ConfirmDelete;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.focus_idx = self.focus_idx.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.focus_idx + 1 < self.habits.len() {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_focused(store),
            KeyCode::Char('x') => self.mark_focused_not_done(store),
            _ => {}
        }
    }

    fn toggle_focused(&mut self, store: &HabitStore) {
        let Some(id) = self.focused().map(|h| h.habit.id) else {
            return;
        };
        if let Err(e) = store.toggle_completion(id, self.today, self.today) {
            self.status = Some(format!("✗ {}", e));
        }
        self.reload(store);
    }

    fn mark_focused_not_done(&mut self, store: &HabitStore) {
        let Some(id) = self.focused().map(|h| h.habit.id) else {
            return;
        };
        if let Err(e) = store.set_completion(id, self.today, false, self.today) {
            self.status = Some(format!("✗ {}", e));
        }
        self.reload(store);
    }

    fn handle_confirm_delete(&mut self, key: KeyEvent, store: &HabitStore) {
        if let KeyCode::Char('y') | KeyCode::Char('Y') = key.code {
            if let Some(id) = self.focused().map(|h| h.habit.id) {
                if let Err(e) = store.delete_habit(id) {
                    self.status = Some(format!("✗ {}", e));
                }
                self.reload(store);
            }
        }
        self.input_mode = InputMode::Normal;
    }

    fn handle_add_input(&mut self, key: KeyEvent, store: &HabitStore) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Enter => {
                let name = self.input_buffer.trim().to_string();
                if name.is_empty() {
                    self.input_error = Some("Type a habit name first".to_string());
                    return;
                }
                let new = NewHabit {
                    name,
                    ..Default::default()
                };
                match store.create_habit(new, Local::now().naive_local()) {
                    Ok(_) => {
                        self.input_mode = InputMode::Normal;
                        self.input_buffer.clear();
                        self.input_error = None;
                        self.reload(store);
                        self.focus_idx = self.habits.len().saturating_sub(1);
                    }
                    Err(e) => {
                        self.input_error = Some(e.to_string());
                    }
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.input_error = None;
            }
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
                self.input_error = None;
            }
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Dashboard => self.draw_dashboard(frame),
            View::Stats => self.draw_stats(frame),
            View::Help => {
                self.draw_dashboard(frame);
                self.draw_help_overlay(frame);
            }
        }

        match self.input_mode {
            InputMode::AddHabit => self.draw_add_input(frame),
            InputMode::ConfirmDelete => self.draw_confirm_delete(frame),
            InputMode::Normal => {}
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(
            frame,
            outer_chunks[0],
            self.today,
            self.done_today(),
            self.habits.len(),
        );
        statusbar::render(frame, outer_chunks[2], self.status.as_deref());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(outer_chunks[1]);

        habits::render(frame, columns[0], &self.habits, self.today, self.focus_idx);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // streak + rate
                Constraint::Length(7), // weekly calendar
                Constraint::Min(0),    // categories
            ])
            .split(columns[1]);

        streak::render(frame, right_chunks[0], &self.stats, self.window_days);
        weekly::render(frame, right_chunks[1], self.focused(), self.today, self.week_days);
        categories::render(frame, right_chunks[2], &self.charts.category_completions);
    }

    fn draw_stats(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled("  Stats  ", theme::accent().add_modifier(Modifier::BOLD)),
            Span::styled("  [Esc] back", theme::dim()),
        ]));
        frame.render_widget(title, chunks[0]);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("  Streak (current):  ", theme::dim()),
                Span::styled(
                    format!("{} days", self.stats.current_streak),
                    theme::green().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Streak (best):     ", theme::dim()),
                Span::styled(format!("{} days", self.stats.best_streak), theme::green()),
            ]),
            Line::from(vec![
                Span::styled("  Completion rate:   ", theme::dim()),
                Span::styled(
                    format!("{}%", self.stats.completion_rate),
                    theme::rate(self.stats.completion_rate),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Overall rate:      ", theme::dim()),
                Span::styled(
                    format!("{}%", self.charts.overall_completion_rate),
                    theme::rate(self.charts.overall_completion_rate),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled("  Daily progress", theme::accent())),
            Line::from(""),
        ];

        // newest first so the most recent days stay visible on short terminals
        for p in self.charts.monthly_progress.iter().rev() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}  ", format_date(p.date)), theme::dim()),
                Span::styled(rate_bar(p.completion_rate, 24), theme::rate(p.completion_rate)),
                Span::styled(format!("  {:>3}%", p.completion_rate), theme::dim()),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), chunks[1]);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: area.height / 2,
        };
        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("  [space] / Enter  ", "Toggle today for the focused habit"),
            ("  [x]              ", "Mark today not done"),
            ("  [a]              ", "Add a habit"),
            ("  [D]              ", "Delete the focused habit"),
            ("  [s]              ", "Stats view"),
            ("  [↑ ↓] / [k j]    ", "Navigate habits"),
            ("  [?]              ", "Toggle help"),
            ("  [Esc]            ", "Quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::accent().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, label) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(key, theme::accent()),
                Span::styled(label, theme::dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::accent())
            .style(theme::surface());

        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }

    fn draw_add_input(&self, frame: &mut Frame) {
        let area = frame.area();
        let height = if self.input_error.is_some() { 7 } else { 5 };
        let popup_area = Rect {
            x: area.width / 4,
            y: (area.height / 2).saturating_sub(3),
            width: area.width / 2,
            height: height.min(area.height),
        };
        frame.render_widget(Clear, popup_area);

        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Name: ", theme::dim()),
                Span::styled(
                    self.input_buffer.as_str(),
                    theme::accent().add_modifier(Modifier::BOLD),
                ),
                Span::styled("█", theme::amber()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  [Enter] add  ·  [Esc] cancel  ·  edit details with `habittrack habit edit`",
                theme::dim(),
            )),
        ];

        if let Some(err) = &self.input_error {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(format!("  ✗ {}", err), theme::red())));
        }

        let block = Block::default()
            .title(Span::styled(" New Habit ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.input_error.is_some() {
                theme::red()
            } else {
                theme::amber()
            })
            .style(theme::surface());

        frame.render_widget(Paragraph::new(text).block(block), popup_area);
    }

    fn draw_confirm_delete(&self, frame: &mut Frame) {
        let Some(habit) = self.focused() else {
            return;
        };
        let area = frame.area();
        let popup_area = Rect {
            x: area.width / 4,
            y: (area.height / 2).saturating_sub(3),
            width: area.width / 2,
            height: 5.min(area.height),
        };
        frame.render_widget(Clear, popup_area);

        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Delete ", theme::dim()),
                Span::styled(habit.habit.name.as_str(), theme::bold()),
                Span::styled(" and all its completions?  ", theme::dim()),
                Span::styled("[y]", theme::red()),
                Span::styled(" / any key", theme::dim()),
            ]),
        ];

        let block = Block::default()
            .title(Span::styled(" Delete Habit ", theme::red()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::red())
            .style(theme::surface());

        frame.render_widget(Paragraph::new(text).block(block), popup_area);
    }
}

/// Run the TUI event loop.
pub fn run(store: &HabitStore, config: &AppConfig, fixed_today: Option<NaiveDate>) -> Result<()> {
    let mut app = App::new(config, fixed_today);
    app.load(store)?;

    let mut terminal = ratatui::init();
    let events = EventHandler::new(config.dashboard.tick_rate_ms);

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(Event::Key(key)) => {
                app.handle_key(key, store);
                if app.should_quit {
                    break Ok(());
                }
            }
            Ok(Event::Resize) => {}
            Ok(Event::Tick) => app.tick(store),
            Err(e) => break Err(e.into()),
        }
    };

    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn setup() -> (HabitStore, App) {
        let store = HabitStore::in_memory(30).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let mut app = App::new(&AppConfig::default(), Some(today));
        app.load(&store).unwrap();
        (store, app)
    }

    fn type_text(app: &mut App, store: &HabitStore, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)), store);
        }
    }

    #[test]
    fn add_toggle_and_delete_from_keyboard() {
        let (store, mut app) = setup();

        app.handle_key(press(KeyCode::Char('a')), &store);
        assert_eq!(app.input_mode, InputMode::AddHabit);
        type_text(&mut app, &store, "Walk");
        app.handle_key(press(KeyCode::Enter), &store);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.habits.len(), 1);

        app.handle_key(press(KeyCode::Char(' ')), &store);
        assert_eq!(app.done_today(), 1);
        assert_eq!(app.habits[0].streak, 1);

        app.handle_key(press(KeyCode::Char('x')), &store);
        assert_eq!(app.done_today(), 0);
        assert_eq!(app.habits[0].completions.len(), 1);

        app.handle_key(press(KeyCode::Char('D')), &store);
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        app.handle_key(press(KeyCode::Char('y')), &store);
        assert!(app.habits.is_empty());
        assert_eq!(app.focus_idx, 0);
    }

    #[test]
    fn empty_name_stays_in_input() {
        let (store, mut app) = setup();
        app.handle_key(press(KeyCode::Char('a')), &store);
        app.handle_key(press(KeyCode::Enter), &store);
        assert_eq!(app.input_mode, InputMode::AddHabit);
        assert!(app.input_error.is_some());
        app.handle_key(press(KeyCode::Esc), &store);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn navigation_is_clamped() {
        let (store, mut app) = setup();
        for name in ["One", "Two"] {
            store
                .create_habit(
                    NewHabit {
                        name: name.to_string(),
                        ..Default::default()
                    },
                    Local::now().naive_local(),
                )
                .unwrap();
        }
        app.load(&store).unwrap();

        app.handle_key(press(KeyCode::Up), &store);
        assert_eq!(app.focus_idx, 0);
        app.handle_key(press(KeyCode::Down), &store);
        app.handle_key(press(KeyCode::Down), &store);
        assert_eq!(app.focus_idx, 1);
        assert_eq!(app.focused().unwrap().habit.name, "Two");
    }

    #[test]
    fn views_toggle_and_escape_quits() {
        let (store, mut app) = setup();
        app.handle_key(press(KeyCode::Char('s')), &store);
        assert_eq!(app.view, View::Stats);
        app.handle_key(press(KeyCode::Esc), &store);
        assert_eq!(app.view, View::Dashboard);
        assert!(!app.should_quit);
        app.handle_key(press(KeyCode::Esc), &store);
        assert!(app.should_quit);
    }
}
