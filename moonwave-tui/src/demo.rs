//! Demo application shipped with the binary
//!
//! A counter on `/` and a static page on `/about`, both nested in a shared
//! layout. Keys map to commands; commands map to dispatched actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use libmoonwave::{Actions, App, Moonwave, RouteDef, State, Store};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use serde_json::{json, Value};

use crate::adapter::{moonwave, Root};
use crate::event::TuiEvent;
use crate::view::{ViewProps, ViewRegistry};

pub const COUNT_KEY: &str = "count";
pub const TITLE_KEY: &str = "title";

const HELP: &str = " +/- count  r reset  h home  a about  q quit ";

/// What a key press asks the application to do
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Split { kind: String, payload: Value },
    Navigate(String),
    Redraw,
    Quit,
}

impl Command {
    fn split(kind: &str, payload: Value) -> Self {
        Command::Split {
            kind: kind.to_string(),
            payload,
        }
    }
}

/// The demo builder for any terminal backend
pub fn app<B: Backend + 'static>() -> Moonwave<Root<B>> {
    moonwave(views())
        .state(initial_state())
        .routes(routes())
        .actions(actions())
}

pub fn initial_state() -> State {
    let mut state = State::new();
    state.insert(TITLE_KEY, json!("Moonwave"));
    state.insert(COUNT_KEY, json!(0));
    state
}

pub fn routes() -> Vec<RouteDef> {
    vec![RouteDef::new("*", "layout")
        .child(RouteDef::new("/", "home"))
        .child(RouteDef::new("/about", "about"))]
}

pub fn actions() -> Actions {
    Actions::new()
        .on("increment", |store: &dyn Store, by: Value| {
            let count = count(&store.get());
            store.update(State::with(COUNT_KEY, json!(count + by.as_i64().unwrap_or(1))))
        })
        .on("reset", |store: &dyn Store, _: Value| {
            store.update(State::with(COUNT_KEY, json!(0)))
        })
}

pub fn views() -> ViewRegistry {
    ViewRegistry::new()
        .register("layout", layout)
        .register("home", home)
        .register("about", about)
}

/// Map a terminal event to a command
pub fn command_for(event: &TuiEvent) -> Option<Command> {
    match event {
        TuiEvent::Resize(..) => Some(Command::Redraw),
        TuiEvent::Key(key) => command_for_key(key),
    }
}

fn command_for_key(key: &KeyEvent) -> Option<Command> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Command::Quit),
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Some(Command::Quit),
        (KeyCode::Char('+'), _) | (KeyCode::Char('i'), _) | (KeyCode::Up, _) => {
            Some(Command::split("increment", json!(1)))
        }
        (KeyCode::Char('-'), _) | (KeyCode::Down, _) => Some(Command::split("increment", json!(-1))),
        (KeyCode::Char('r'), _) => Some(Command::split("reset", Value::Null)),
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Some(Command::Navigate("/".to_string())),
        (KeyCode::Char('a'), _) | (KeyCode::Right, _) => {
            Some(Command::Navigate("/about".to_string()))
        }
        _ => None,
    }
}

/// Run a command against the application; `Ok(false)` means quit
pub fn apply<T>(app: &App<T>, command: Command) -> libmoonwave::Result<bool> {
    match command {
        Command::Split { kind, payload } => app.split(&kind, payload)?,
        Command::Navigate(path) => app.navigate(path)?,
        Command::Redraw => {
            // An empty patch still notifies, which schedules a render
            if let Some(store) = app.store() {
                store.update(State::new())?;
            }
        }
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn count(state: &State) -> i64 {
    state.get(COUNT_KEY).and_then(Value::as_i64).unwrap_or(0)
}

fn layout(frame: &mut Frame, area: Rect, props: &ViewProps) -> Rect {
    let title = props
        .state
        .get(TITLE_KEY)
        .and_then(Value::as_str)
        .unwrap_or("Moonwave");

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let footer = Line::from(vec![
        Span::styled(
            format!(" {} ", props.route.path),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(HELP, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(footer), chunks[1]);

    chunks[0]
}

fn home(frame: &mut Frame, area: Rect, props: &ViewProps) -> Rect {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Count: {}", count(props.state)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
    area
}

fn about(frame: &mut Frame, area: Rect, _props: &ViewProps) -> Rect {
    let text = vec![
        Line::from(""),
        Line::from("Actions flow through one evolution function."),
        Line::from("Navigation goes through the router."),
        Line::from("Renders happen at most once per frame."),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
    area
}
