//! Line-based interactive prompting.
//!
//! [`Prompter`] asks a question, validates the answer and asks again until
//! the answer is valid. It is generic over its input and output so the same
//! loop runs against the terminal and against scripted input in tests.

use std::fmt::Display;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

use tracing::debug;

use devstack_core::{DevstackError, Result};

/// Asks questions on `output` and reads answers from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// Prompter reading stdin and writing stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask until `validate` accepts the answer.
    ///
    /// Each answer is trimmed before validation. Errors that
    /// [`DevstackError::is_reprompt_allowed`] are printed and the question is
    /// asked again, with no limit on attempts. Any other error is returned, as
    /// is [`DevstackError::InputClosed`] once input runs out.
    pub fn ask<T, F>(&mut self, label: &str, mut validate: F) -> Result<T>
    where
        F: FnMut(&str) -> Result<T>,
    {
        let mut attempt = 0u32;
        loop {
            attempt = attempt.saturating_add(1);
            write!(self.output, "{label}").map_err(DevstackError::Terminal)?;
            self.output.flush().map_err(DevstackError::Terminal)?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(DevstackError::Terminal)?;
            if read == 0 {
                return Err(DevstackError::InputClosed {
                    label: label.trim_end_matches([':', ' ']).to_string(),
                });
            }

            match validate(line.trim()) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_reprompt_allowed() => {
                    debug!(label, attempt, error = %e, "rejected answer, asking again");
                    writeln!(self.output, "{e}").map_err(DevstackError::Terminal)?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Print a line of progress output.
    pub fn say(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.output, "{message}").map_err(DevstackError::Terminal)
    }

    /// Consume the prompter, returning its output.
    pub fn into_output(self) -> W {
        self.output
    }
}
