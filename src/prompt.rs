//! Interactive terminal prompts.
//!
//! Reads answers line by line from any [`BufRead`] and writes questions to any
//! [`Write`], so the binary can use stdin/stderr while tests use buffers.
//! Interactive reads block, so async callers go through [`ask`].

use crate::error::{Result, WhitelistError};
use crate::request::ZoneChoice;
use console::style;
use std::io::{self, BufRead, BufReader, Write};

/// Question/answer prompt over a reader and a writer.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl Prompt<BufReader<io::Stdin>, io::Stderr> {
    /// Prompt on the process's stdin and stderr.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

/// Run `question` against `prompt` on tokio's blocking pool.
///
/// The prompt is handed back with the answer so it can be reused.
pub async fn ask<R, W, T, F>(mut prompt: Prompt<R, W>, question: F) -> Result<(Prompt<R, W>, T)>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
    T: Send + 'static,
    F: FnOnce(&mut Prompt<R, W>) -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || -> Result<(Prompt<R, W>, T)> {
        let answer = question(&mut prompt)?;
        Ok((prompt, answer))
    })
    .await
    .map_err(|e| WhitelistError::Prompt(io::Error::other(e)))?
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    /// Create a prompt over the given streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask the user to pick one zone. Re-asks until the answer is valid.
    pub fn select_zone(&mut self, choices: &[ZoneChoice]) -> Result<ZoneChoice> {
        if choices.is_empty() {
            return Err(WhitelistError::NoZones);
        }

        self.question("Zone:")?;
        for (i, choice) in choices.iter().enumerate() {
            writeln!(
                self.output,
                "  {} {}",
                style(format!("{:>2})", i + 1)).cyan(),
                choice.name
            )
            .map_err(WhitelistError::Prompt)?;
        }

        loop {
            write!(self.output, "  Select [1-{}]: ", choices.len())
                .map_err(WhitelistError::Prompt)?;
            self.output.flush().map_err(WhitelistError::Prompt)?;

            let answer = self.read_answer()?;
            if let Some(index) = parse_selection(&answer, choices) {
                return Ok(choices[index].clone());
            }

            writeln!(
                self.output,
                "  {} enter a number between 1 and {}, or a zone name",
                style(">>").red(),
                choices.len()
            )
            .map_err(WhitelistError::Prompt)?;
        }
    }

    /// Ask for free-text notes. An empty answer is returned as-is.
    pub fn notes(&mut self) -> Result<String> {
        self.question("Notes (optional):")?;
        write!(self.output, "  ").map_err(WhitelistError::Prompt)?;
        self.output.flush().map_err(WhitelistError::Prompt)?;
        self.read_answer()
    }

    fn question(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{} {}", style("?").green().bold(), style(message).bold())
            .map_err(WhitelistError::Prompt)
    }

    fn read_answer(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(WhitelistError::Prompt)?;
        if read == 0 {
            return Err(WhitelistError::Prompt(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            )));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Resolve an answer to an index: a 1-based number, a zone name, or a zone id.
pub fn parse_selection(answer: &str, choices: &[ZoneChoice]) -> Option<usize> {
    let answer = answer.trim();
    if answer.is_empty() {
        return None;
    }

    if let Ok(n) = answer.parse::<usize>() {
        if (1..=choices.len()).contains(&n) {
            return Some(n - 1);
        }
    }

    choices
        .iter()
        .position(|c| c.name.eq_ignore_ascii_case(answer) || c.value == answer)
}
