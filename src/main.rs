//! Kitchen Timer - A countdown/count-up kitchen timer for the terminal
//!
//! This is the main entry point for the kitchen-timer application.

use std::{io, sync::Arc};
use anyhow::Context;
use crossterm::tty::IsTty;
use tracing::info;

use kitchen_timer::{
    config::Config,
    engine::TimerEngine,
    services::{load_or_default, TerminalDisplay},
    state::AppState,
    tasks::{spawn_stdin_reader, spawn_terminal_reader, TimerRuntime},
    utils::{shutdown_signal, LogWriter, TerminalGuard},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let interactive = !config.line_input && io::stdin().is_tty();

    // Logs go to stderr so they don't clobber the status line
    tracing_subscriber::fmt()
        .with_env_filter(format!("kitchen_timer={}", config.log_level()))
        .with_writer(move || LogWriter::new(io::stderr(), interactive))
        .init();

    info!("Starting kitchen-timer v1.0.0");
    if config.no_persist {
        info!("Persistence disabled");
    } else {
        info!("State file: {}", config.state_file.display());
    }

    // Restore the last known state (or start fresh) and apply any preset
    let store = config.state_store();
    let restored = load_or_default(store.as_ref());
    let initial = config.apply_preset(restored);

    let engine = TimerEngine::new(initial).with_alarm_duration(config.alarm_duration());
    let state = Arc::new(AppState::new(engine, store));
    if initial != restored {
        state.persist(&initial);
    }

    let runtime = TimerRuntime::new(
        Arc::clone(&state),
        config.audio_player(),
        Box::new(TerminalDisplay::new(!config.no_title)),
    );

    let terminal = if interactive {
        let guard = TerminalGuard::enable().context("Failed to set up the terminal")?;
        spawn_terminal_reader(runtime.sender(), Arc::clone(&state))
            .context("Failed to start input reader")?;

        info!("Keys:");
        info!("  Up / Down          - Add or remove a minute");
        info!("  Right / Left       - Add or remove a second");
        info!("  Mouse wheel        - Adjust minutes or seconds under the pointer");
        info!("  Space or Enter     - Start / pause");
        info!("  Backspace or c     - Clear (also silences the alarm)");
        info!("  ?                  - Print the current status as JSON");
        info!("  q, Esc or Ctrl-C   - Quit");
        Some(guard)
    } else {
        spawn_stdin_reader(runtime.sender()).context("Failed to start input reader")?;

        info!("Commands (one per line):");
        info!("  m+ / m-     - Add or remove a minute");
        info!("  s+ / s-     - Add or remove a second");
        info!("  t or Enter  - Start / pause");
        info!("  c           - Clear (also silences the alarm)");
        info!("  status      - Print the current status as JSON");
        info!("  q           - Quit");
        None
    };

    tokio::select! {
        _ = runtime.run() => {}
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Restore the terminal and finish the status line before the final log
    drop(terminal);
    println!();
    match state.get_timer_state() {
        Ok(timer) => {
            state.persist(&timer);
            info!("Stopped at {} ({})", timer.display(), timer.mode);
        }
        Err(e) => tracing::error!("{}", e),
    }

    Ok(())
}
