//! Raw terminal mode for key and mouse-wheel input

use std::io::{self, Write};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tracing::{debug, warn};

/// Keeps the terminal in raw mode with mouse capture until dropped
#[derive(Debug)]
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        debug!("Raw mode with mouse capture enabled");
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), DisableMouseCapture) {
            warn!("Failed to disable mouse capture: {}", e);
        }
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to leave raw mode: {}", e);
        }
    }
}

/// Log writer that restores carriage returns while the terminal is raw
pub struct LogWriter<W: Write> {
    inner: W,
    raw: bool,
}

impl<W: Write> LogWriter<W> {
    pub fn new(inner: W, raw: bool) -> Self {
        Self { inner, raw }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for LogWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.raw || !buf.contains(&b'\n') {
            return self.inner.write(buf);
        }

        let mut translated = Vec::with_capacity(buf.len() + 8);
        for &byte in buf {
            if byte == b'\n' {
                translated.push(b'\r');
            }
            translated.push(byte);
        }
        self.inner.write_all(&translated)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(raw: bool, text: &str) -> String {
        let mut writer = LogWriter::new(Vec::new(), raw);
        writer.write_all(text.as_bytes()).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_raw_writer_adds_carriage_returns() {
        assert_eq!(written(true, "one\ntwo\n"), "one\r\ntwo\r\n");
    }

    #[test]
    fn test_cooked_writer_passes_through() {
        assert_eq!(written(false, "one\ntwo\n"), "one\ntwo\n");
        assert_eq!(written(true, "no newline"), "no newline");
    }
}
