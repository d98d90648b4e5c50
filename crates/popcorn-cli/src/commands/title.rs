use popcorn_core::TitleSink;
use std::io::{IsTerminal, Write};

/// Sets the terminal window title with an OSC 0 escape on stderr.
pub struct TerminalTitle {
    enabled: bool,
}

impl TerminalTitle {
    pub fn new() -> Self {
        Self {
            enabled: std::io::stderr().is_terminal(),
        }
    }
}

impl TitleSink for TerminalTitle {
    fn set_title(&self, title: &str) {
        if !self.enabled {
            return;
        }
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "\x1b]0;{}\x07", title);
        let _ = stderr.flush();
    }
}
