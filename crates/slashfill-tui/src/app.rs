//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic.
//!
//! The form fields are the inputs the [`SuggestEngine`] observes. Every
//! frame polls the engine for the newest suggestion response, so store reads
//! never block key handling.

use std::{future::Future, io, sync::Arc, time::Duration};

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent, Direction},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        edit_modal::{EditModal, EditModalState, ModalAction},
        entry_table::{EntryTable, EntryTableState},
        form::{FieldId, Form, FormState},
        header::Header,
        help::HelpPopup,
        suggestion_overlay::{overlay_area, Anchor, SuggestionOverlay},
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    text::{Line, Span},
    Frame, Terminal,
};
use slashfill_core::{config::Config, Entry, EntryStore, Overlay, SuggestEngine};
use tokio::runtime::Handle;

// ---------------------------------------------------------------------------
// Focus + status types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// A form field; the suggest engine observes it.
    Field(FieldId),
    Entries,
    /// The entries search filter.
    Search,
    /// The edit modal is open.
    Modal,
    /// Vim-style `:` command line is active.
    Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub form: FormState,
    pub entries: EntryTableState,
    pub modal: Option<EditModalState>,
    pub command_bar: CommandBarState,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub theme: Theme,
    pub config: Config,
    pub show_help: bool,
    pub status: Option<Status>,
    pub quit: bool,
    /// Set by `:w`; the caller prints the form values after exit.
    pub submitted: bool,
    pub engine: SuggestEngine<FieldId>,
    pub store_label: String,
    store: Arc<dyn EntryStore>,
    runtime: Handle,
}

impl AppState {
    pub fn new(
        fields: &[String],
        config: Config,
        store: Arc<dyn EntryStore>,
        runtime: Handle,
        store_label: String,
    ) -> Self {
        let engine = SuggestEngine::new(store.clone(), runtime.clone(), config.insertion.mode);
        let mut state = AppState {
            form: FormState::new(fields.iter().cloned()),
            entries: EntryTableState::default(),
            modal: None,
            command_bar: CommandBarState::default(),
            focus: Focus::Entries,
            prev_focus: Focus::Entries,
            theme: Theme::by_name(&config.ui.theme),
            config,
            show_help: false,
            status: None,
            quit: false,
            submitted: false,
            engine,
            store_label,
            store,
            runtime,
        };

        if let Err(e) = state.reload_entries() {
            tracing::warn!(error = %e, "initial store read failed");
            state.error(format!("{e:#}"));
        }
        if let Some(first) = state.form.current_id() {
            state.set_focus(Focus::Field(first));
        }
        state
    }

    /// Move focus, attaching the engine to form fields and detaching it
    /// from the field being left.
    pub fn set_focus(&mut self, next: Focus) {
        if self.focus == next {
            return;
        }
        if let Focus::Field(old) = self.focus {
            self.engine.focus_out(old);
        }
        if let Focus::Field(new) = next {
            self.engine.focus_in(new);
            self.form.focus(new);
        }
        tracing::debug!(from = ?self.focus, to = ?next, "focus change");
        self.focus = next;
    }

    /// Run a store operation to completion on the runtime.
    pub fn block_on_store<T, F, Fut>(&self, op: F) -> slashfill_core::error::Result<T>
    where
        F: FnOnce(Arc<dyn EntryStore>) -> Fut,
        Fut: Future<Output = slashfill_core::error::Result<T>>,
    {
        self.runtime.block_on(op(self.store.clone()))
    }

    /// Refresh the entries pane from the store.
    pub fn reload_entries(&mut self) -> anyhow::Result<()> {
        let entries = self.block_on_store(|store| async move { store.fetch_all().await })?;
        tracing::debug!(count = entries.len(), "entries reloaded");
        self.entries.replace(entries);
        Ok(())
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.status = Some(Status::Info(message.into()));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.status = Some(Status::Error(message.into()));
    }

    fn next_field(&self, id: FieldId) -> Option<FieldId> {
        let index = self.form.index_of(id)?;
        self.form.fields.get(index + 1).map(|f| f.id)
    }

    fn prev_field(&self, id: FieldId) -> Option<FieldId> {
        let index = self.form.index_of(id)?.checked_sub(1)?;
        self.form.fields.get(index).map(|f| f.id)
    }

    /// Apply the highlighted suggestion to the field it belongs to.
    fn commit_selection(&mut self) {
        let target = match self.engine.overlay() {
            Overlay::Visible { input, .. } => *input,
            Overlay::Hidden => return,
        };
        let current = self
            .form
            .get(target)
            .map(|f| (f.input.value.as_str(), f.input.cursor));
        let Some(commit) = self.engine.select(current) else {
            return;
        };
        if let Some(field) = self.form.get_mut(commit.input) {
            field.input.set(commit.value, commit.cursor);
        }
        self.info(format!(
            "inserted {} [{}]",
            commit.suggestion.key, commit.suggestion.tag
        ));
    }

    fn delete_selection(&mut self) {
        let ids = self.entries.selection();
        if ids.is_empty() {
            return;
        }
        let result = self.block_on_store(|store| async move { store.remove(&ids).await });
        match result {
            Ok(removed) => {
                self.entries.marked.clear();
                if let Err(e) = self.reload_entries() {
                    self.error(format!("{e:#}"));
                } else {
                    self.info(format!("deleted {removed} entries"));
                }
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    fn save_modal(&mut self, entry: Entry) {
        let Some(modal) = &self.modal else {
            return;
        };
        let original = modal.original.clone();
        let result = self.block_on_store(|store| async move {
            match original {
                Some(id) => store.update(&id, entry).await,
                None => store.insert(entry).await,
            }
        });
        match result {
            Ok(id) => {
                tracing::debug!(id = %id, "entry saved");
                self.modal = None;
                self.set_focus(Focus::Entries);
                if let Err(e) = self.reload_entries() {
                    self.error(format!("{e:#}"));
                } else {
                    self.info(format!("saved {id}"));
                }
            }
            Err(e) => {
                if let Some(modal) = &mut self.modal {
                    modal.error = Some(e.to_string());
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
}

impl App {
    pub fn new(state: AppState) -> Self {
        App { state }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<AppState> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        self.state.engine.teardown();
        result.map(|()| self.state)
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.state.engine.poll();
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        let app_event = if is_insert_mode(self.state.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                            self.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn handle(&mut self, event: AppEvent) {
        let s = &mut self.state;

        // Help popup intercepts all events; only close keys pass through.
        if s.show_help {
            match event {
                AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit => {
                    tracing::debug!("help popup closed");
                    s.show_help = false;
                }
                _ => {}
            }
            return;
        }

        // Terminal resize is handled automatically by ratatui
        if let AppEvent::Resize(_, _) = event {
            return;
        }

        match s.focus {
            Focus::Command => handle_command(s, event),
            Focus::Modal => handle_modal(s, event),
            Focus::Field(id) => handle_field(s, id, event),
            Focus::Search => handle_search(s, event),
            Focus::Entries => handle_entries(s, event),
        }
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys (and `/`) should produce characters rather than trigger
/// shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    !matches!(focus, Focus::Entries)
}

// ---------------------------------------------------------------------------
// Per-focus handlers
// ---------------------------------------------------------------------------

fn handle_command(s: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Escape => {
            tracing::debug!("command bar cancelled");
            s.command_bar.clear();
            s.focus = s.prev_focus;
        }
        AppEvent::Enter => {
            let input = s.command_bar.input.value.clone();
            match Command::parse(&input) {
                Ok(cmd) => {
                    tracing::debug!(command = ?cmd, "executing command");
                    s.command_bar.clear();
                    s.focus = s.prev_focus;
                    if let Err(e) = execute_command(s, cmd) {
                        tracing::warn!(error = %e, "command failed");
                        // Reopen the bar with the error; input stays cleared
                        s.command_bar.error = Some(format!("{e:#}"));
                        s.focus = Focus::Command;
                    }
                }
                Err(msg) if msg.is_empty() => {
                    // Empty input, just close
                    s.command_bar.clear();
                    s.focus = s.prev_focus;
                }
                Err(msg) => {
                    // Show the error; bar stays open
                    s.command_bar.error = Some(msg);
                }
            }
        }
        AppEvent::Quit => s.quit = true,
        other => s.command_bar.handle(&other),
    }
}

fn handle_modal(s: &mut AppState, event: AppEvent) {
    if event == AppEvent::Quit {
        s.quit = true;
        return;
    }
    let Some(modal) = &mut s.modal else {
        s.set_focus(Focus::Entries);
        return;
    };
    match modal.handle(&event) {
        ModalAction::None => {}
        ModalAction::Cancel => {
            tracing::debug!("edit modal cancelled");
            s.modal = None;
            s.set_focus(Focus::Entries);
        }
        ModalAction::Save(entry) => s.save_modal(entry),
    }
}

fn handle_field(s: &mut AppState, id: FieldId, event: AppEvent) {
    let overlay_open = s.engine.overlay().is_visible();
    match event {
        AppEvent::Quit => s.quit = true,

        // Keys routed to the overlay while it is open
        AppEvent::Nav(Direction::Down) if overlay_open => s.engine.highlight_next(),
        AppEvent::Nav(Direction::Up) if overlay_open => s.engine.highlight_prev(),
        AppEvent::Enter | AppEvent::FocusNext if overlay_open => s.commit_selection(),
        AppEvent::Escape if overlay_open => {
            tracing::debug!("suggestions dismissed");
            s.engine.dismiss();
        }

        AppEvent::Escape => s.set_focus(Focus::Entries),
        AppEvent::Enter | AppEvent::Nav(Direction::Down) => {
            if let Some(next) = s.next_field(id) {
                s.set_focus(Focus::Field(next));
            }
        }
        AppEvent::Nav(Direction::Up) => {
            if let Some(prev) = s.prev_field(id) {
                s.set_focus(Focus::Field(prev));
            }
        }
        AppEvent::FocusNext => {
            let next = s.next_field(id).map(Focus::Field).unwrap_or(Focus::Entries);
            s.set_focus(next);
        }
        AppEvent::FocusPrev => {
            let prev = s.prev_field(id).map(Focus::Field).unwrap_or(Focus::Entries);
            s.set_focus(prev);
        }

        other => {
            let Some(field) = s.form.get_mut(id) else {
                return;
            };
            if field.input.handle(&other) {
                s.engine
                    .input_changed(id, &field.input.value, field.input.cursor);
            }
        }
    }
}

fn handle_search(s: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Quit => s.quit = true,
        AppEvent::Escape | AppEvent::Enter | AppEvent::FocusNext | AppEvent::FocusPrev => {
            s.set_focus(Focus::Entries);
        }
        AppEvent::Nav(Direction::Up | Direction::Down) => {
            s.entries.handle(&event);
        }
        other => {
            s.entries.edit_filter(&other);
        }
    }
}

fn handle_entries(s: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Quit => {
            tracing::debug!("quit");
            s.quit = true;
        }

        // Toggle help
        AppEvent::Char('?') => {
            tracing::debug!("help popup opened");
            s.show_help = true;
        }

        // Enter command mode with `:`
        AppEvent::Char(':') => {
            tracing::debug!(prev_focus = ?s.focus, "entering command mode");
            s.prev_focus = s.focus;
            s.command_bar.clear();
            s.focus = Focus::Command;
        }

        AppEvent::SearchFocus => s.set_focus(Focus::Search),

        AppEvent::FocusNext => {
            if let Some(first) = s.form.fields.first().map(|f| f.id) {
                s.set_focus(Focus::Field(first));
            }
        }
        AppEvent::FocusPrev => {
            if let Some(last) = s.form.fields.last().map(|f| f.id) {
                s.set_focus(Focus::Field(last));
            }
        }

        AppEvent::Char('n') => {
            s.modal = Some(EditModalState::create());
            s.set_focus(Focus::Modal);
        }
        AppEvent::Char('e') | AppEvent::Enter => {
            if let Some((id, entry)) = s.entries.current() {
                s.modal = Some(EditModalState::edit(id, &entry));
                s.set_focus(Focus::Modal);
            }
        }
        AppEvent::Char('d') | AppEvent::Delete => s.delete_selection(),

        other => {
            s.entries.handle(&other);
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 1-line header | body | 1-line status
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(area);

    // Horizontal body split: form | entries
    let pct = state.config.ui.entries_pane_width_pct.min(90);
    let horiz = Layout::default()
        .direction(LayoutDir::Horizontal)
        .constraints([Constraint::Fill(1), Constraint::Percentage(pct)])
        .split(vert[1]);

    let focused_field = match state.focus {
        Focus::Field(id) => Some(id),
        _ => None,
    };

    frame.render_widget(
        Header::new(
            &state.store_label,
            state.entries.len(),
            state.engine.insertion(),
            &state.theme,
        ),
        vert[0],
    );
    frame.render_widget(Form::new(&state.form, focused_field, &state.theme), horiz[0]);
    frame.render_widget(
        EntryTable::new(
            &state.entries,
            state.focus == Focus::Entries,
            state.focus == Focus::Search,
            &state.theme,
        ),
        horiz[1],
    );
    draw_status(frame, state, vert[2]);

    if let Some(overlay) = overlay_rect(state, horiz[0], area) {
        frame.render_widget(
            SuggestionOverlay::new(
                state.engine.overlay().suggestions(),
                state.engine.overlay().highlighted().unwrap_or(0),
                &state.theme,
            ),
            overlay,
        );
    }

    if let Some(modal) = &state.modal {
        let widget = EditModal::new(modal, &state.theme);
        let cursor = widget.cursor_position(area);
        frame.render_widget(widget, area);
        frame.set_cursor_position(cursor);
    }

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect {
            y: area.bottom().saturating_sub(1),
            height: 1,
            ..area
        };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return;
    }

    match state.focus {
        Focus::Field(_) => {
            let form = Form::new(&state.form, focused_field, &state.theme);
            if let Some(pos) = form.cursor_position(horiz[0]) {
                frame.set_cursor_position(pos);
            }
        }
        Focus::Search => {
            let table = EntryTable::new(&state.entries, false, true, &state.theme);
            frame.set_cursor_position(table.filter_cursor_position(horiz[1]));
        }
        _ => {}
    }
}

/// Screen rect for the suggestion overlay, below the field it belongs to.
/// `None` while the overlay is hidden or its field is scrolled out of view.
fn overlay_rect(state: &AppState, form_area: Rect, screen: Rect) -> Option<Rect> {
    let Overlay::Visible {
        input, suggestions, ..
    } = state.engine.overlay()
    else {
        return None;
    };
    let index = state.form.index_of(*input)?;
    let field = state.form.field_rect(Form::inner(form_area), index)?;
    let anchor = Anchor::for_field(field, state.form.scroll);
    overlay_area(
        anchor,
        state.form.scroll,
        screen,
        suggestions.len(),
        state.config.ui.overlay_max_items,
        state.config.ui.overlay_width,
    )
}

fn draw_status(frame: &mut Frame, state: &AppState, area: Rect) {
    let line = match &state.status {
        Some(Status::Info(msg)) => Line::from(Span::styled(format!(" {msg}"), state.theme.status_info)),
        Some(Status::Error(msg)) => {
            Line::from(Span::styled(format!(" E  {msg}"), state.theme.status_error))
        }
        None => Line::from(Span::styled(
            " type / in a field to insert a snippet · : for commands",
            state.theme.status_info,
        )),
    };
    frame.render_widget(line, area);
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
