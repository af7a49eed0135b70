//! Application state for the TUI.

use std::time::Instant;

use chrono::{Duration, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use daygrid_core::{
    build_day, Config, PositionedSession, ProjectionConfig, RenderModel, SelectionController,
    SelectionEffect, SelectionEvent, SelectionState, Session, SessionId,
};

/// Main application state.
pub struct App {
    /// Grid projection derived from the layout config
    pub projection: ProjectionConfig,
    /// Gutter label spacing
    pub row_interval_minutes: u32,
    /// Where the grid stops
    pub day_end_minutes: u32,
    /// Every session in the loaded file
    sessions: Vec<Session>,
    /// Day currently shown
    pub date: NaiveDate,
    /// Render model for `date`
    pub model: RenderModel,
    /// Tap-to-expand state
    pub controller: SelectionController,
    /// Keyboard cursor as an index into `model.sessions` (paint order)
    pub cursor: Option<usize>,
    /// First visible grid row
    pub scroll_rows: u16,
    /// Detail waiting to open after the group picker closed
    pending_detail: Option<(SessionId, Instant)>,
    /// Error from building the current day, shown in the header
    pub status: Option<String>,
    /// Whether the app should exit
    pub should_quit: bool,
}

impl App {
    /// Create a new App showing `date`.
    pub fn new(config: &Config, sessions: Vec<Session>, date: NaiveDate) -> anyhow::Result<Self> {
        let projection = config.layout.projection()?;
        let day_end_minutes = config.layout.day_end_minutes()?;

        let mut app = Self {
            projection,
            row_interval_minutes: config.layout.row_interval_minutes,
            day_end_minutes,
            sessions,
            date,
            model: RenderModel {
                config: projection,
                sessions: Vec::new(),
            },
            controller: SelectionController::new(config.selection.detail_delay()),
            cursor: None,
            scroll_rows: 0,
            pending_detail: None,
            status: None,
            should_quit: false,
        };
        app.rebuild();
        Ok(app)
    }

    /// Rebuild the render model for the current date.
    pub fn rebuild(&mut self) {
        match build_day(&self.sessions, self.date, &self.projection) {
            Ok(day) => {
                self.model = day.model;
                self.status = None;
            }
            Err(e) => {
                tracing::warn!(date = %self.date, error = %e, "Failed to lay out day");
                self.model.sessions.clear();
                self.status = Some(e.to_string());
            }
        }

        self.cursor = if self.model.is_empty() { None } else { Some(0) };
        self.pending_detail = None;
        self.dispatch(SelectionEvent::ModelRebuilt);

        tracing::debug!(
            date = %self.date,
            sessions = self.model.len(),
            clusters = self.model.cluster_count(),
            "Rebuilt day model"
        );
    }

    /// Session under the keyboard cursor.
    pub fn cursor_session(&self) -> Option<&PositionedSession> {
        self.cursor.and_then(|idx| self.model.sessions.get(idx))
    }

    pub fn selection(&self) -> &SelectionState {
        self.controller.state()
    }

    /// Run a selection event and carry out its effects.
    fn dispatch(&mut self, event: SelectionEvent) {
        let effects = self.controller.update(&self.model, event);
        for effect in effects {
            match effect {
                SelectionEffect::ScheduleDetail { session, after } => {
                    self.pending_detail = Some((session, Instant::now() + after));
                }
            }
        }
    }

    /// Fire any scheduled transition that is due.
    pub fn tick(&mut self, now: Instant) {
        let due = matches!(&self.pending_detail, Some((_, at)) if *at <= now);
        if due {
            if let Some((session, _)) = self.pending_detail.take() {
                self.dispatch(SelectionEvent::DetailReady(session));
            }
        }
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.selection() {
            SelectionState::None => self.handle_grid_key(key),
            SelectionState::GroupOpen { .. } => self.handle_group_key(key),
            SelectionState::DetailOpen { .. } => self.handle_detail_key(key),
        }
    }

    /// Handle keyboard input on the grid.
    fn handle_grid_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Enter => {
                if let Some(id) = self.cursor_session().map(|p| p.id().clone()) {
                    self.dispatch(SelectionEvent::Tap(id));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous();
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.scroll_rows = 0;
                self.cursor = if self.model.is_empty() { None } else { Some(0) };
            }
            KeyCode::PageDown | KeyCode::Char('d') => {
                self.scroll_rows = self.scroll_rows.saturating_add(10);
            }
            KeyCode::PageUp | KeyCode::Char('u') => {
                self.scroll_rows = self.scroll_rows.saturating_sub(10);
            }
            KeyCode::Right | KeyCode::Char(']') | KeyCode::Char('l') => {
                self.shift_day(1);
            }
            KeyCode::Left | KeyCode::Char('[') | KeyCode::Char('h') => {
                self.shift_day(-1);
            }
            _ => {}
        }
    }

    /// Handle keyboard input in the group picker.
    fn handle_group_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.dispatch(SelectionEvent::Close);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.dispatch(SelectionEvent::HighlightNext);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.dispatch(SelectionEvent::HighlightPrevious);
            }
            KeyCode::Enter => {
                self.dispatch(SelectionEvent::ConfirmHighlighted);
            }
            _ => {}
        }
    }

    /// Handle keyboard input in the detail view.
    fn handle_detail_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
            self.dispatch(SelectionEvent::Close);
        }
    }

    fn select_next(&mut self) {
        if self.model.is_empty() {
            return;
        }
        let last = self.model.len() - 1;
        self.cursor = Some(match self.cursor {
            Some(idx) => (idx + 1).min(last),
            None => 0,
        });
    }

    fn select_previous(&mut self) {
        if self.model.is_empty() {
            return;
        }
        self.cursor = Some(self.cursor.map(|idx| idx.saturating_sub(1)).unwrap_or(0));
    }

    fn shift_day(&mut self, days: i64) {
        self.date += Duration::days(days);
        self.scroll_rows = 0;
        self.rebuild();
    }
}
