//! Command handlers

use tracing::{error, info};

use crate::{
    engine::{Effect, TimerEngine},
    state::AppState,
};
use super::{responses::StatusResponse, Command};

/// What the runtime should do after a command was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The engine transitioned; carry out these effects
    Effects(Vec<Effect>),
    /// Print the current status
    Status(StatusResponse),
    /// Stop the runtime
    Quit,
}

/// Route a command to the engine
pub fn handle_command(state: &AppState, command: Command) -> Result<CommandOutcome, String> {
    let action = command.action_name();
    let effects = match command {
        Command::AdjustMinutes(step) => state.update_timer(action, |e| e.adjust_minutes(step)),
        Command::AdjustSeconds(step) => state.update_timer(action, |e| e.adjust_seconds(step)),
        Command::ToggleStart => state.update_timer(action, TimerEngine::toggle_start),
        Command::Clear => state.update_timer(action, TimerEngine::clear),
        Command::Status => return status_handler(state).map(CommandOutcome::Status),
        Command::Quit => {
            info!("Quit requested");
            return Ok(CommandOutcome::Quit);
        }
    };

    match effects {
        Ok(effects) => {
            if let Ok(timer) = state.get_timer_state() {
                info!("{} -> {} ({})", action, timer.display(), timer.mode);
            }
            Ok(CommandOutcome::Effects(effects))
        }
        Err(e) => {
            error!("Failed to handle {}: {}", action, e);
            Err(e)
        }
    }
}

/// Build the current status
pub fn status_handler(state: &AppState) -> Result<StatusResponse, String> {
    let timer = state.get_timer_state()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(StatusResponse {
        seconds: timer.seconds,
        display: timer.display(),
        mode: timer.mode,
        uptime: state.get_uptime(),
        last_action,
        last_action_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::{
        engine::Step,
        services::MemoryStore,
        state::{TimerMode, TimerState},
    };

    fn app_state() -> AppState {
        AppState::new(TimerEngine::default(), Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_adjust_then_start() {
        let state = app_state();
        handle_command(&state, Command::AdjustMinutes(Step::Up)).unwrap();
        handle_command(&state, Command::AdjustSeconds(Step::Up)).unwrap();

        let outcome = handle_command(&state, Command::ToggleStart).unwrap();
        assert_eq!(outcome, CommandOutcome::Effects(vec![Effect::StartTicking]));
        assert_eq!(state.get_timer_state().unwrap(), TimerState::with(61, TimerMode::CountingDown));
    }

    #[test]
    fn test_status_reports_last_action() {
        let state = app_state();
        handle_command(&state, Command::AdjustSeconds(Step::Up)).unwrap();

        let CommandOutcome::Status(status) = handle_command(&state, Command::Status).unwrap() else {
            panic!("expected a status outcome");
        };
        assert_eq!(status.seconds, 1);
        assert_eq!(status.display, "00:01");
        assert_eq!(status.mode, TimerMode::Idle);
        assert_eq!(status.last_action.as_deref(), Some("seconds+"));
    }

    #[test]
    fn test_quit() {
        assert_eq!(handle_command(&app_state(), Command::Quit), Ok(CommandOutcome::Quit));
    }
}
