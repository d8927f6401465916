//! Command input: line commands from a pipe, keys and mouse wheel from a terminal

use std::{
    io::{self, BufRead},
    sync::Arc,
    thread,
};
use crossterm::event::{
    self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
    MouseEventKind,
};
use tracing::{debug, info, warn};

use crate::{commands::Command, engine::Step, state::AppState};
use super::runtime::{Event, EventSender};

/// Parse commands line by line and forward them until EOF or a quit command
///
/// Returns the number of commands forwarded.
pub fn read_commands<R: BufRead>(reader: R, events: &EventSender) -> usize {
    let mut forwarded = 0;

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                warn!("{} (try m+, m-, s+, s-, t, c, status, q)", e);
                continue;
            }
        };

        debug!("Input command: {}", command);
        if events.send(Event::Command(command)).is_err() {
            debug!("Runtime gone, stopping input");
            break;
        }
        forwarded += 1;

        if command == Command::Quit {
            break;
        }
    }

    forwarded
}

/// Read stdin on a dedicated thread so a blocking read never holds up the runtime
pub fn spawn_stdin_reader(events: EventSender) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            read_commands(stdin.lock(), &events);
            info!("Input closed; press Ctrl-C to exit");
        })
}

/// Column of the `:` in the rendered clock for the given minutes
pub fn colon_column(minutes: u64) -> u16 {
    if minutes < 100 {
        2
    } else {
        minutes.to_string().len() as u16
    }
}

fn map_key(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        // Raw mode swallows SIGINT, so Ctrl-C arrives as a key
        return matches!(key.code, KeyCode::Char('c')).then_some(Command::Quit);
    }

    match key.code {
        KeyCode::Up => Some(Command::AdjustMinutes(Step::Up)),
        KeyCode::Down => Some(Command::AdjustMinutes(Step::Down)),
        KeyCode::Right => Some(Command::AdjustSeconds(Step::Up)),
        KeyCode::Left => Some(Command::AdjustSeconds(Step::Down)),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('t') => Some(Command::ToggleStart),
        KeyCode::Backspace | KeyCode::Delete | KeyCode::Char('c') => Some(Command::Clear),
        KeyCode::Char('?') => Some(Command::Status),
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

fn map_mouse(mouse: &MouseEvent, colon_column: u16) -> Option<Command> {
    let step = match mouse.kind {
        MouseEventKind::ScrollUp => Step::from_wheel(-1),
        MouseEventKind::ScrollDown => Step::from_wheel(1),
        _ => return None,
    };

    // The clock is drawn from column 0: minutes sit left of the colon
    if mouse.column < colon_column {
        Some(Command::AdjustMinutes(step))
    } else {
        Some(Command::AdjustSeconds(step))
    }
}

/// Translate a terminal event into a timer command
pub fn map_terminal_event(event: &TermEvent, colon_column: u16) -> Option<Command> {
    match event {
        TermEvent::Key(key) => map_key(key),
        TermEvent::Mouse(mouse) => map_mouse(mouse, colon_column),
        _ => None,
    }
}

/// Read keys and mouse-wheel events on a dedicated thread
///
/// The terminal must already be in raw mode with mouse capture enabled.
pub fn spawn_terminal_reader(
    events: EventSender,
    state: Arc<AppState>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("terminal-events".to_string())
        .spawn(move || loop {
            let term_event = match event::read() {
                Ok(term_event) => term_event,
                Err(e) => {
                    warn!("Failed to read terminal event: {}", e);
                    break;
                }
            };

            let colon = state
                .get_timer_state()
                .map(|timer| colon_column(timer.minutes()))
                .unwrap_or(2);
            let Some(command) = map_terminal_event(&term_event, colon) else {
                continue;
            };

            debug!("Terminal command: {}", command);
            if events.send(Event::Command(command)).is_err() || command == Command::Quit {
                break;
            }
        })
}
