use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

/// Where commands report to and read confirmations from.
pub trait Console {
    fn say(&mut self, message: &str);
    fn warn(&mut self, message: &str);
    /// Show `question` and block for one line of input. `None` at end of input.
    fn ask(&mut self, question: &str) -> Result<Option<String>>;
}

/// Standard output for reports, standard error for failures, standard input for answers.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn say(&mut self, message: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{message}");
    }

    fn warn(&mut self, message: &str) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{message}");
    }

    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question}").context("failed to write prompt")?;
        stdout.flush().context("failed to flush prompt")?;
        drop(stdout);

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read answer from stdin")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
