//! Terminal display of the current time

use std::io::{self, Write};
use crossterm::{
    cursor::MoveToColumn,
    execute,
    style::Print,
    terminal::{Clear, ClearType, SetTitle},
};
use tracing::debug;

/// Receives `(minutes, seconds)` whenever the displayed value changes
pub trait DisplaySink: Send {
    fn render(&mut self, minutes: u64, seconds: u64);

    /// Print a one-off line (e.g. the status JSON) above the clock
    fn show_status(&mut self, line: &str);
}

/// Format a clock value as `MM:SS`
pub fn format_clock(minutes: u64, seconds: u64) -> String {
    format!("{:02}:{:02}", minutes, seconds)
}

/// Rewrites a single status line and mirrors the clock into the terminal title
#[derive(Debug)]
pub struct TerminalDisplay<W: Write = io::Stdout> {
    out: W,
    set_title: bool,
    last_clock: Option<String>,
}

impl TerminalDisplay {
    pub fn new(set_title: bool) -> Self {
        Self::with_writer(io::stdout(), set_title)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn with_writer(out: W, set_title: bool) -> Self {
        Self {
            out,
            set_title,
            last_clock: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, clock: &str) -> io::Result<()> {
        if self.set_title {
            execute!(self.out, SetTitle(clock))?;
        }
        execute!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(clock)
        )
    }

    fn write_status(&mut self, line: &str) -> io::Result<()> {
        // Raw mode disables output translation, so end lines with \r\n explicitly
        execute!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(line),
            Print("\r\n")
        )?;
        match self.last_clock.clone() {
            Some(clock) => execute!(self.out, Print(clock)),
            None => Ok(()),
        }
    }
}

impl<W: Write + Send> DisplaySink for TerminalDisplay<W> {
    fn render(&mut self, minutes: u64, seconds: u64) {
        let clock = format_clock(minutes, seconds);
        if let Err(e) = self.write_frame(&clock) {
            debug!("Failed to render {}: {}", clock, e);
        }
        self.last_clock = Some(clock);
    }

    fn show_status(&mut self, line: &str) {
        if let Err(e) = self.write_status(line) {
            debug!("Failed to print status: {}", e);
        }
    }
}
