//! Interactive commit message prompt.

use std::io::{self, BufRead, Write};

use daybook_core::{CoreError, CoreResult, MessageProvider};

/// Asks for the commit message on the terminal.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl MessageProvider for StdinPrompt {
    fn commit_message(&mut self) -> CoreResult<String> {
        let mut stderr = io::stderr();
        write!(stderr, "Commit message: ").map_err(|e| CoreError::MessageUnavailable(e.to_string()))?;
        stderr.flush().map_err(|e| CoreError::MessageUnavailable(e.to_string()))?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).map_err(|e| CoreError::MessageUnavailable(e.to_string()))? == 0 {
            return Err(CoreError::MessageUnavailable(
                "standard input is closed".to_string(),
            ));
        }
        Ok(line)
    }
}
