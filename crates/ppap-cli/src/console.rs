//! Terminal-backed password prompts.

use console::Term;
use console::style;
use ppap_core::SecretConsole;
use std::io;
use std::io::IsTerminal;

/// Reads passwords from the controlling terminal without echo.
pub struct TermConsole {
    term: Term,
    use_colors: bool,
}

impl TermConsole {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            use_colors: console::colors_enabled_stderr(),
        }
    }
}

impl Default for TermConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretConsole for TermConsole {
    fn is_interactive(&self) -> bool {
        io::stdin().is_terminal() && self.term.is_term()
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        self.term.write_str(prompt)?;
        self.term.read_secure_line()
    }

    fn warn(&mut self, message: &str) {
        let line = if self.use_colors {
            style(message).yellow().to_string()
        } else {
            message.to_string()
        };
        let _ = self.term.write_line(&line);
    }
}
