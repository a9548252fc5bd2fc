use crate::generator::{RandomGenerator, TodoGenerator};
use crate::todo::{Filter, TodoDraft, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};
use crate::todo_list::{TodoStore, BULK_COUNT};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs},
    Frame, Terminal,
};
use std::io;
use tracing::info;
use unicode_width::UnicodeWidthChar;

/// Which part of the screen receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Title,
    Description,
    Table,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Title => Focus::Description,
            Focus::Description => Focus::Table,
            Focus::Table => Focus::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Title => Focus::Table,
            Focus::Description => Focus::Title,
            Focus::Table => Focus::Description,
        }
    }
}

/// State owned by one running todo view.
#[derive(Debug)]
pub struct App<G = RandomGenerator> {
    pub store: TodoStore<G>,
    pub draft: TodoDraft,
    pub focus: Focus,
    pub table_state: TableState,
    bulk_count: usize,
    should_quit: bool,
}

impl<G: TodoGenerator> App<G> {
    pub fn new(store: TodoStore<G>) -> Self {
        Self {
            store,
            draft: TodoDraft::default(),
            focus: Focus::Title,
            table_state: TableState::default(),
            bulk_count: BULK_COUNT,
            should_quit: false,
        }
    }

    pub fn with_bulk_count(mut self, bulk_count: usize) -> Self {
        self.bulk_count = bulk_count;
        self
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn add(&mut self) {
        if self.store.add(&mut self.draft).is_some() {
            self.clamp_selection();
        }
    }

    pub fn bulk_generate(&mut self) {
        self.store.bulk_generate(self.bulk_count);
        self.clamp_selection();
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.store.set_filter(filter);
        self.clamp_selection();
    }

    /// Toggle the todo under the table cursor.
    pub fn toggle_selected(&mut self) {
        let id = match self.table_state.selected() {
            Some(idx) => self.store.visible_todos().get(idx).map(|t| t.id.clone()),
            None => None,
        };
        if let Some(id) = id {
            self.store.toggle(&id);
            self.clamp_selection();
        }
    }

    fn select_next(&mut self) {
        let len = self.store.visible_todos().len();
        if len == 0 {
            return;
        }
        let next = match self.table_state.selected() {
            Some(idx) if idx + 1 < len => idx + 1,
            Some(idx) => idx,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if let Some(idx) = self.table_state.selected() {
            self.table_state.select(Some(idx.saturating_sub(1)));
        }
    }

    /// Keep the cursor on a visible row, or clear it when nothing is shown.
    fn clamp_selection(&mut self) {
        let len = self.store.visible_todos().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            let idx = self.table_state.selected().unwrap_or(0).min(len - 1);
            self.table_state.select(Some(idx));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Title | Focus::Description => self.handle_input_key(key),
            Focus::Table => self.handle_table_key(key),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let (field, cap) = match self.focus {
            Focus::Title => (&mut self.draft.title, TITLE_MAX_LEN),
            _ => (&mut self.draft.description, DESCRIPTION_MAX_LEN),
        };
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                // Length caps are input constraints: extra keystrokes are dropped.
                if field.chars().count() < cap {
                    field.push(c);
                }
            }
            KeyCode::Backspace => {
                field.pop();
            }
            KeyCode::Enter => self.add(),
            KeyCode::Esc => self.focus = Focus::Table,
            _ => {}
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('a') => self.focus = Focus::Title,
            KeyCode::Char('g') => self.bulk_generate(),
            KeyCode::Char('f') => self.set_filter(self.store.filter().next()),
            KeyCode::Char('1') => self.set_filter(Filter::All),
            KeyCode::Char('2') => self.set_filter(Filter::Completed),
            KeyCode::Char('3') => self.set_filter(Filter::Pending),
            _ => {}
        }
    }
}

pub fn run_app<B: Backend, G: TodoGenerator>(
    terminal: &mut Terminal<B>,
    app: &mut App<G>,
) -> io::Result<()> {
    run_app_with(terminal, app, event::read)
}

/// Draw/read loop over an arbitrary event source; stops on quit or the first error.
pub fn run_app_with<B, G, F>(
    terminal: &mut Terminal<B>,
    app: &mut App<G>,
    mut next_event: F,
) -> io::Result<()>
where
    B: Backend,
    G: TodoGenerator,
    F: FnMut() -> io::Result<Event>,
{
    info!("Entering event loop");
    loop {
        terminal.draw(|f| render(f, app))?;

        if let Event::Key(key) = next_event()? {
            app.handle_key(key);
        }
        if app.should_quit() {
            info!(todos = app.store.len(), "Leaving event loop");
            return Ok(());
        }
    }
}

pub fn render<G: TodoGenerator>(f: &mut Frame, app: &mut App<G>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_inputs(f, app, chunks[1]);
    render_filter(f, app, chunks[2]);
    render_table(f, app, chunks[3]);
    render_help(f, app, chunks[4]);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn bulk_label(count: usize) -> String {
    if count >= 1_000 && count % 1_000 == 0 {
        format!("Add {}k todos", count / 1_000)
    } else {
        format!("Add {count} todos")
    }
}

fn render_header<G: TodoGenerator>(f: &mut Frame, app: &App<G>, area: Rect) {
    let counts = app.store.counts();
    let line = Line::from(vec![
        Span::styled("Todo List", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            "  {} total, {} completed, {} pending",
            counts.total, counts.completed, counts.pending
        )),
    ]);
    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_inputs<G: TodoGenerator>(f: &mut Frame, app: &App<G>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let fields = [
        (Focus::Title, "Add a new todo", &app.draft.title, TITLE_MAX_LEN),
        (
            Focus::Description,
            "Description",
            &app.draft.description,
            DESCRIPTION_MAX_LEN,
        ),
    ];
    for ((focus, placeholder, text, cap), area) in fields.into_iter().zip(chunks.iter()) {
        let focused = app.focus == focus;
        let inner_width = area.width.saturating_sub(2) as usize;
        let len = text.chars().count();
        // Leave one column free for the cursor after the last character.
        let (tail, tail_width) = visible_tail(text, inner_width.saturating_sub(1));
        let content = if text.is_empty() {
            Line::from(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
        } else {
            Line::from(tail)
        };
        let block = Block::default()
            .title(format!("{placeholder} ({len}/{cap})"))
            .borders(Borders::ALL)
            .border_style(border_style(focused));
        f.render_widget(Paragraph::new(content).block(block), *area);

        if focused && inner_width > 0 {
            let x = area.x + 1 + tail_width.min(inner_width - 1) as u16;
            f.set_cursor_position((x, area.y + 1));
        }
    }
}

/// Longest suffix of `text` whose display width fits in `max_width`, with that width.
fn visible_tail(text: &str, max_width: usize) -> (&str, usize) {
    let mut width = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        start = idx;
    }
    (&text[start..], width)
}

fn render_filter<G: TodoGenerator>(f: &mut Frame, app: &App<G>, area: Rect) {
    let tabs = Tabs::new(Filter::ALL.iter().map(|filter| filter.label()))
        .block(Block::default().title("Filter").borders(Borders::ALL))
        .select(app.store.filter().index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn render_table<G: TodoGenerator>(f: &mut Frame, app: &mut App<G>, area: Rect) {
    let done = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::CROSSED_OUT);

    let rows: Vec<Row> = app
        .store
        .visible_todos()
        .into_iter()
        .map(|t| {
            let text_style = if t.completed { done } else { Style::default() };
            let (status, action) = if t.completed {
                (Span::styled("Completed", Style::default().fg(Color::Green)), "↶ undo")
            } else {
                (Span::styled("Pending", Style::default().fg(Color::Yellow)), "✓ done")
            };
            Row::new(vec![
                Cell::from(Span::styled(t.title.clone(), text_style)),
                Cell::from(Span::styled(t.description.clone(), text_style)),
                Cell::from(status),
                Cell::from(action),
            ])
        })
        .collect();

    let header = Row::new(vec!["Title", "Description", "Status", ""])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(50),
            Constraint::Length(10),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title("Todos")
            .borders(Borders::ALL)
            .border_style(border_style(app.focus == Focus::Table)),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_help<G: TodoGenerator>(f: &mut Frame, app: &App<G>, area: Rect) {
    let hint = match app.focus {
        Focus::Title | Focus::Description => {
            "Enter: Add  Tab: next field  Esc: table  Ctrl-C: quit".to_string()
        }
        Focus::Table => format!(
            "Space: toggle  a: Add  g: {}  f/1/2/3: filter  q: quit",
            bulk_label(app.bulk_count)
        ),
    };
    f.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
