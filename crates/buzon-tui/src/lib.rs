// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use buzon_app::{
    AppCommand, AppEvent, AppState, LoginFormInput, Message, MessageFormInput, Route, Screen,
};
use buzon_store::filter_and_sort;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const STATUS_CLEAR_SECS: u64 = 4;

/// Everything the UI needs from the outside world. The binary wires this
/// to the message store and the configured credentials.
pub trait AppRuntime {
    fn load_messages(&mut self) -> Result<Vec<Message>>;
    fn submit_message(&mut self, form: &MessageFormInput) -> Result<Message>;
    fn delete_message(&mut self, id: &str) -> Result<()>;
    fn authenticate(&mut self, username: &str, password: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Title,
    Content,
}

impl FormField {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Title, Self::Content];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Title => "Title",
            Self::Content => "Message",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

impl LoginField {
    pub const ALL: [Self; 2] = [Self::Username, Self::Password];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Password => "Password",
        }
    }
}

/// Rotates focus through `fields`, wrapping at either end.
pub fn cycle_field<T: Copy + PartialEq>(fields: &[T], current: T, delta: isize) -> T {
    let index = fields
        .iter()
        .position(|field| *field == current)
        .unwrap_or(0) as isize;
    let len = fields.len() as isize;
    fields[(index + delta).rem_euclid(len) as usize]
}

enum InternalEvent {
    ClearStatus { token: u64 },
}

struct ViewData {
    form: MessageFormInput,
    form_focus: FormField,
    login: LoginFormInput,
    login_focus: LoginField,
    messages: Vec<Message>,
    visible: Vec<Message>,
    editing_search: bool,
    table_state: TableState,
    status_token: u64,
}

impl Default for ViewData {
    fn default() -> Self {
        Self {
            form: MessageFormInput::default(),
            form_focus: FormField::Name,
            login: LoginFormInput::default(),
            login_focus: LoginField::Username,
            messages: Vec::new(),
            visible: Vec::new(),
            editing_search: false,
            table_state: TableState::default(),
            status_token: 0,
        }
    }
}

impl ViewData {
    fn selected_message(&self) -> Option<&Message> {
        self.table_state
            .selected()
            .and_then(|index| self.visible.get(index))
    }

    fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let last = self.visible.len() as isize - 1;
        let next = (current + delta).clamp(0, last) as usize;
        self.table_state.select(Some(next));
    }
}

/// Recomputes the admin panel's derived view from the loaded messages and
/// the session's query/direction, keeping the selection in range.
fn recompute_visible(state: &AppState, view: &mut ViewData) {
    view.visible = filter_and_sort(&view.messages, &state.search_query, state.sort_ascending);
    if view.visible.is_empty() {
        view.table_state.select(None);
    } else {
        let selected = view.table_state.selected().unwrap_or(0);
        view.table_state
            .select(Some(selected.min(view.visible.len() - 1)));
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    if state.screen == Screen::AdminPanel {
        refresh_messages(state, runtime, &mut view_data, &internal_tx);
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &mut view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(STATUS_CLEAR_SECS));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

/// Dispatches a command and, when it set a status line, arms the
/// auto-clear timer for it.
fn apply(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) -> Vec<AppEvent> {
    let events = state.dispatch(command);
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
    events
}

fn refresh_messages<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match runtime.load_messages() {
        Ok(messages) => {
            view_data.messages = messages;
            recompute_visible(state, view_data);
        }
        Err(error) => {
            apply(
                state,
                view_data,
                internal_tx,
                AppCommand::SetStatus(format!("load failed: {error}")),
            );
        }
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match state.screen {
        Screen::PublicForm => handle_form_key(state, runtime, view_data, internal_tx, key),
        Screen::LoginGate => handle_login_key(state, runtime, view_data, internal_tx, key),
        Screen::AdminPanel => handle_admin_key(state, runtime, view_data, internal_tx, key),
    }
    false
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if key.code == KeyCode::Char('a') && key.modifiers.contains(KeyModifiers::CONTROL) {
        view_data.login.reset();
        view_data.login_focus = LoginField::Username;
        apply(
            state,
            view_data,
            internal_tx,
            AppCommand::Navigate(Route::AdminPanel),
        );
        return;
    }

    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        submit_form(state, runtime, view_data, internal_tx);
        return;
    }

    match key.code {
        KeyCode::Tab => {
            view_data.form_focus = cycle_field(&FormField::ALL, view_data.form_focus, 1);
        }
        KeyCode::BackTab => {
            view_data.form_focus = cycle_field(&FormField::ALL, view_data.form_focus, -1);
        }
        KeyCode::Enter => {
            if view_data.form_focus == FormField::Content {
                view_data.form.content.push('\n');
            } else {
                view_data.form_focus = cycle_field(&FormField::ALL, view_data.form_focus, 1);
            }
        }
        KeyCode::Backspace => {
            form_field_mut(&mut view_data.form, view_data.form_focus).pop();
        }
        KeyCode::Char(ch) if key.modifiers.intersection(KeyModifiers::CONTROL).is_empty() => {
            form_field_mut(&mut view_data.form, view_data.form_focus).push(ch);
        }
        _ => {}
    }
}

fn submit_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if let Err(error) = view_data.form.validate() {
        apply(
            state,
            view_data,
            internal_tx,
            AppCommand::SetStatus(error.to_string()),
        );
        return;
    }

    match runtime.submit_message(&view_data.form) {
        Ok(_message) => {
            view_data.form.reset();
            view_data.form_focus = FormField::Name;
            apply(
                state,
                view_data,
                internal_tx,
                AppCommand::SetStatus("message sent".to_owned()),
            );
        }
        Err(error) => {
            // Write failed; keep the typed fields so nothing is lost.
            apply(
                state,
                view_data,
                internal_tx,
                AppCommand::SetStatus(format!("send failed: {error}")),
            );
        }
    }
}

fn handle_login_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            view_data.login.reset();
            apply(state, view_data, internal_tx, AppCommand::CancelLogin);
        }
        KeyCode::Tab | KeyCode::BackTab => {
            view_data.login_focus = match view_data.login_focus {
                LoginField::Username => LoginField::Password,
                LoginField::Password => LoginField::Username,
            };
        }
        KeyCode::Enter => {
            if let Err(error) = view_data.login.validate() {
                apply(
                    state,
                    view_data,
                    internal_tx,
                    AppCommand::SetStatus(error.to_string()),
                );
                return;
            }

            let accepted =
                runtime.authenticate(&view_data.login.username, &view_data.login.password);
            if accepted {
                view_data.login.reset();
                apply(state, view_data, internal_tx, AppCommand::LoginSucceeded);
                refresh_messages(state, runtime, view_data, internal_tx);
            } else {
                apply(state, view_data, internal_tx, AppCommand::LoginFailed);
            }
        }
        KeyCode::Backspace => {
            login_field_mut(&mut view_data.login, view_data.login_focus).pop();
        }
        KeyCode::Char(ch) if key.modifiers.intersection(KeyModifiers::CONTROL).is_empty() => {
            login_field_mut(&mut view_data.login, view_data.login_focus).push(ch);
        }
        _ => {}
    }
}

fn handle_admin_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if view_data.editing_search {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                view_data.editing_search = false;
            }
            KeyCode::Backspace => {
                let mut query = state.search_query.clone();
                query.pop();
                apply(
                    state,
                    view_data,
                    internal_tx,
                    AppCommand::SetSearchQuery(query),
                );
                recompute_visible(state, view_data);
            }
            KeyCode::Char(ch) if key.modifiers.intersection(KeyModifiers::CONTROL).is_empty() => {
                let mut query = state.search_query.clone();
                query.push(ch);
                apply(
                    state,
                    view_data,
                    internal_tx,
                    AppCommand::SetSearchQuery(query),
                );
                recompute_visible(state, view_data);
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => {
            apply(state, view_data, internal_tx, AppCommand::Logout);
        }
        KeyCode::Char('/') => {
            view_data.editing_search = true;
        }
        KeyCode::Char('s') => {
            apply(
                state,
                view_data,
                internal_tx,
                AppCommand::ToggleSortDirection,
            );
            recompute_visible(state, view_data);
        }
        KeyCode::Char('r') => {
            refresh_messages(state, runtime, view_data, internal_tx);
        }
        KeyCode::Char('d') => {
            let Some(id) = view_data.selected_message().map(|message| message.id.clone()) else {
                return;
            };
            match runtime.delete_message(&id) {
                Ok(()) => {
                    apply(
                        state,
                        view_data,
                        internal_tx,
                        AppCommand::SetStatus("message deleted".to_owned()),
                    );
                    refresh_messages(state, runtime, view_data, internal_tx);
                }
                Err(error) => {
                    apply(
                        state,
                        view_data,
                        internal_tx,
                        AppCommand::SetStatus(format!("delete failed: {error}")),
                    );
                }
            }
        }
        KeyCode::Up | KeyCode::Char('k') => view_data.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => view_data.move_selection(1),
        _ => {}
    }
}

fn form_field_mut(form: &mut MessageFormInput, focus: FormField) -> &mut String {
    match focus {
        FormField::Name => &mut form.name,
        FormField::Email => &mut form.email,
        FormField::Title => &mut form.title,
        FormField::Content => &mut form.content,
    }
}

fn login_field_mut(form: &mut LoginFormInput, focus: LoginField) -> &mut String {
    match focus {
        LoginField::Username => &mut form.username,
        LoginField::Password => &mut form.password,
    }
}

/// Shortens an RFC 3339 timestamp to `YYYY-MM-DD HH:MM` for table cells.
pub fn display_timestamp(raw: &str) -> String {
    raw.chars().take(16).collect::<String>().replace('T', " ")
}

fn render(frame: &mut Frame, state: &AppState, view_data: &mut ViewData) {
    match state.screen {
        Screen::PublicForm => render_public_form(frame, state, view_data),
        Screen::LoginGate => render_login_gate(frame, state, view_data),
        Screen::AdminPanel => render_admin_panel(frame, state, view_data),
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn input_block(label: &str, focused: bool) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(label.to_owned())
        .border_style(focus_style(focused))
}

fn status_paragraph(state: &AppState) -> Paragraph<'_> {
    let text = state.status_line.clone().unwrap_or_default();
    Paragraph::new(text).style(Style::default().fg(Color::Cyan))
}

fn render_public_form(frame: &mut Frame, state: &AppState, view_data: &ViewData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(
        Paragraph::new("Send us a message").style(Style::default().add_modifier(Modifier::BOLD)),
        chunks[0],
    );

    let fields = [
        (FormField::Name, &view_data.form.name, chunks[1]),
        (FormField::Email, &view_data.form.email, chunks[2]),
        (FormField::Title, &view_data.form.title, chunks[3]),
    ];
    for (field, value, area) in fields {
        let focused = view_data.form_focus == field;
        frame.render_widget(
            Paragraph::new(value.as_str()).block(input_block(field.label(), focused)),
            area,
        );
    }

    let content_focused = view_data.form_focus == FormField::Content;
    frame.render_widget(
        Paragraph::new(view_data.form.content.as_str())
            .wrap(Wrap { trim: false })
            .block(input_block(FormField::Content.label(), content_focused)),
        chunks[4],
    );

    frame.render_widget(
        Paragraph::new("Tab next field · Ctrl+S send · Ctrl+A admin · Ctrl+Q quit")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[5],
    );
    frame.render_widget(status_paragraph(state), chunks[6]);
}

fn render_login_gate(frame: &mut Frame, state: &AppState, view_data: &ViewData) {
    let area = centered_rect(frame.area(), 46, 11);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new("Admin login").style(Style::default().add_modifier(Modifier::BOLD)),
        chunks[0],
    );

    frame.render_widget(
        Paragraph::new(view_data.login.username.as_str()).block(input_block(
            LoginField::Username.label(),
            view_data.login_focus == LoginField::Username,
        )),
        chunks[1],
    );

    let masked = "*".repeat(view_data.login.password.chars().count());
    frame.render_widget(
        Paragraph::new(masked).block(input_block(
            LoginField::Password.label(),
            view_data.login_focus == LoginField::Password,
        )),
        chunks[2],
    );

    frame.render_widget(
        Paragraph::new("Enter login · Tab switch field · Esc cancel")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );
    frame.render_widget(status_paragraph(state), chunks[4]);
}

fn render_admin_panel(frame: &mut Frame, state: &AppState, view_data: &mut ViewData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let direction = if state.sort_ascending {
        "oldest first"
    } else {
        "newest first"
    };
    frame.render_widget(
        Paragraph::new(format!(
            "Inbox · {} total · {} shown · {direction}",
            view_data.messages.len(),
            view_data.visible.len(),
        ))
        .style(Style::default().add_modifier(Modifier::BOLD)),
        chunks[0],
    );

    let search_marker = if view_data.editing_search { "▸" } else { " " };
    frame.render_widget(
        Paragraph::new(format!("{search_marker} search: {}", state.search_query))
            .style(focus_style(view_data.editing_search)),
        chunks[1],
    );

    let header = Row::new(["Name", "Email", "Title", "Message", "Date"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = view_data
        .visible
        .iter()
        .map(|message| {
            Row::new([
                Cell::from(message.name.clone()),
                Cell::from(message.email.clone()),
                Cell::from(message.title.clone()),
                Cell::from(first_line(&message.content)),
                Cell::from(display_timestamp(&message.created_at)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(16),
            Constraint::Percentage(22),
            Constraint::Percentage(20),
            Constraint::Percentage(28),
            Constraint::Percentage(14),
        ],
    )
    .header(header)
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .block(Block::default().borders(Borders::ALL));

    frame.render_stateful_widget(table, chunks[2], &mut view_data.table_state);

    frame.render_widget(
        Paragraph::new("/ search · s sort · d delete · r reload · Esc logout · Ctrl+Q quit")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );
    frame.render_widget(status_paragraph(state), chunks[4]);
}

fn first_line(content: &str) -> String {
    content.lines().next().unwrap_or_default().to_owned()
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
