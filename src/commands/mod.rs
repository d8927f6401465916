//! User command module
//!
//! This module contains the commands accepted from the input surface, their
//! handlers and the response structures they print.

pub mod handlers;
pub mod responses;

use std::{fmt, str::FromStr};

use crate::engine::Step;

/// A command from the input surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AdjustMinutes(Step),
    AdjustSeconds(Step),
    ToggleStart,
    Clear,
    Status,
    Quit,
}

impl Command {
    /// Name recorded as the last action
    pub fn action_name(&self) -> &'static str {
        match self {
            Command::AdjustMinutes(Step::Up) => "minutes+",
            Command::AdjustMinutes(Step::Down) => "minutes-",
            Command::AdjustSeconds(Step::Up) => "seconds+",
            Command::AdjustSeconds(Step::Down) => "seconds-",
            Command::ToggleStart => "toggle",
            Command::Clear => "clear",
            Command::Status => "status",
            Command::Quit => "quit",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_name())
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = match s.trim().to_lowercase().as_str() {
            "m+" | "minutes+" | "+m" => Command::AdjustMinutes(Step::Up),
            "m-" | "minutes-" | "-m" => Command::AdjustMinutes(Step::Down),
            "s+" | "seconds+" | "+s" => Command::AdjustSeconds(Step::Up),
            "s-" | "seconds-" | "-s" => Command::AdjustSeconds(Step::Down),
            // An empty line (just Enter) toggles, like pressing the big button
            "" | "t" | "toggle" | "start" | "stop" | "pause" => Command::ToggleStart,
            "c" | "clear" => Command::Clear,
            "status" | "?" => Command::Status,
            "q" | "quit" | "exit" => Command::Quit,
            other => return Err(format!("Unknown command: '{}'", other)),
        };
        Ok(command)
    }
}
