//! Line-mode prompts used while the full-screen UI is not attached
//! (before the terminal is entered and after it is restored).

use std::io::{BufRead, Write};

use hotspot_core::NativePrompt;

#[derive(Debug, Default)]
pub struct TerminalPrompt;

/// `y`/`yes` in any case confirms; anything else declines.
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl NativePrompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        let mut stderr = std::io::stderr().lock();
        if write!(stderr, "{message} [y/N] ").and_then(|()| stderr.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }

    fn alert(&self, message: &str) {
        let _ = writeln!(std::io::stderr(), "{message}");
    }
}
