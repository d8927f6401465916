//! Alarm and chime playback

use std::{
    io,
    process::Stdio,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use crossterm::{execute, style::Print};
use tokio::{
    process::{Child, Command},
    task::JoinHandle,
    time::interval,
};
use tracing::{debug, info, warn};

/// How often the terminal bell repeats while the alarm sounds
pub const BELL_INTERVAL: Duration = Duration::from_secs(1);

/// Sound output used by the timer runtime
///
/// Failures are reported to the caller, which logs them; they never affect timer state.
pub trait AudioPlayer: Send {
    /// Start sounding the alarm
    fn play_alarm(&mut self) -> Result<(), String>;

    /// Silence the alarm; must be safe to call when nothing is playing
    fn stop_alarm(&mut self) -> Result<(), String>;

    /// Short notification on a five-minute mark
    fn chime(&mut self) -> Result<(), String> {
        Ok(())
    }
}

/// Ring the terminal bell
fn ring_bell() -> Result<(), String> {
    execute!(io::stdout(), Print('\x07'))
        .map_err(|e| format!("Failed to ring terminal bell: {}", e))
}

/// Plays everything through the terminal bell, repeating it until the alarm stops
#[derive(Debug, Default)]
pub struct TerminalBell {
    ringer: Option<JoinHandle<()>>,
    rings: Arc<AtomicUsize>,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ringing(&self) -> bool {
        self.ringer.is_some()
    }

    /// Total bells rung so far
    pub fn rings(&self) -> usize {
        self.rings.load(Ordering::SeqCst)
    }
}

impl AudioPlayer for TerminalBell {
    fn play_alarm(&mut self) -> Result<(), String> {
        self.stop_alarm()?;
        info!("Alarm!");

        let rings = Arc::clone(&self.rings);
        self.ringer = Some(tokio::spawn(async move {
            let mut interval = interval(BELL_INTERVAL);
            loop {
                interval.tick().await;
                if let Err(e) = ring_bell() {
                    debug!("{}", e);
                }
                rings.fetch_add(1, Ordering::SeqCst);
            }
        }));
        Ok(())
    }

    fn stop_alarm(&mut self) -> Result<(), String> {
        if let Some(ringer) = self.ringer.take() {
            ringer.abort();
            debug!("Bell stopped");
        }
        Ok(())
    }

    fn chime(&mut self) -> Result<(), String> {
        self.rings.fetch_add(1, Ordering::SeqCst);
        ring_bell()
    }
}

impl Drop for TerminalBell {
    fn drop(&mut self) {
        if let Some(ringer) = self.ringer.take() {
            ringer.abort();
        }
    }
}

/// Send SIGKILL to every process in a process group
fn kill_process_group(pgid: u32) -> Result<(), String> {
    let status = std::process::Command::new("kill")
        .args(["-s", "KILL", "--", &format!("-{}", pgid)])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| format!("Failed to execute kill: {}", e))?;

    // kill fails if the group is already gone, which is fine
    debug!("kill group {} completed (exit code: {})", pgid, status.code().unwrap_or(-1));
    Ok(())
}

/// Plays the alarm by running a shell command (e.g. `paplay alarm.wav`)
///
/// The command runs in its own process group; stopping the alarm kills the
/// whole group, so compound commands and loops stop too.
#[derive(Debug)]
pub struct CommandPlayer {
    command: String,
    child: Option<(Child, u32)>,
}

impl CommandPlayer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            child: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.child.is_some()
    }
}

impl AudioPlayer for CommandPlayer {
    fn play_alarm(&mut self) -> Result<(), String> {
        self.stop_alarm()?;

        debug!("Spawning alarm command: {}", self.command);
        let child = Command::new("sh")
            .args(["-c", &self.command])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Failed to spawn alarm command '{}': {}", self.command, e))?;

        let pgid = child
            .id()
            .ok_or_else(|| "Alarm command exited before it could be tracked".to_string())?;

        info!("Alarm command started (process group {})", pgid);
        self.child = Some((child, pgid));
        Ok(())
    }

    fn stop_alarm(&mut self) -> Result<(), String> {
        let Some((mut child, pgid)) = self.child.take() else {
            return Ok(());
        };

        // The shell may be done while something it started keeps playing
        if let Ok(Some(status)) = child.try_wait() {
            debug!("Alarm shell already finished ({})", status);
        }

        kill_process_group(pgid)?;
        if let Err(e) = child.start_kill() {
            debug!("Alarm shell already gone: {}", e);
        }

        info!("Alarm command stopped");
        Ok(())
    }

    fn chime(&mut self) -> Result<(), String> {
        ring_bell()
    }
}

impl Drop for CommandPlayer {
    fn drop(&mut self) {
        if let Err(e) = self.stop_alarm() {
            warn!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_command_player_stops_long_running_command() {
        let mut player = CommandPlayer::new("sleep 30");
        player.play_alarm().unwrap();
        assert!(player.is_playing());

        player.stop_alarm().unwrap();
        assert!(!player.is_playing());

        // Stopping twice is harmless
        player.stop_alarm().unwrap();
    }

    fn still_running(pattern: &str) -> bool {
        std::process::Command::new("pgrep")
            .args(["-f", pattern])
            .stdout(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_stop_kills_every_process_the_command_started() {
        // Unique duration so pgrep only sees this test's process
        let marker = format!("sleep 7{}.25", std::process::id());
        let mut player = CommandPlayer::new(format!("{}; true", marker));

        player.play_alarm().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(still_running(&marker));

        player.stop_alarm().unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!still_running(&marker), "alarm command outlived stop_alarm");
    }

    #[tokio::test]
    async fn test_dropping_player_stops_command() {
        let marker = format!("sleep 8{}.5", std::process::id());
        let mut player = CommandPlayer::new(format!("while true; do {}; done", marker));

        player.play_alarm().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        drop(player);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!still_running(&marker));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bell_repeats_until_stopped() {
        let mut bell = TerminalBell::new();
        bell.play_alarm().unwrap();
        assert!(bell.is_ringing());

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(bell.rings(), 3);

        bell.stop_alarm().unwrap();
        assert!(!bell.is_ringing());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(bell.rings(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bell_restart_keeps_single_ringer() {
        let mut bell = TerminalBell::new();
        bell.play_alarm().unwrap();
        bell.play_alarm().unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        // One ringer: immediate bell plus one after a second
        assert_eq!(bell.rings(), 2);
        bell.stop_alarm().unwrap();
    }

    #[tokio::test]
    async fn test_command_player_replaces_previous_alarm() {
        let mut player = CommandPlayer::new("sleep 30");
        player.play_alarm().unwrap();
        player.play_alarm().unwrap();
        assert!(player.is_playing());
        player.stop_alarm().unwrap();
    }
}
