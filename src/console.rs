//! Interactive operator console
//!
//! Reads one command per line, hands it to the exchange, and prints the
//! outcome. Questions the exchange needs answered mid-command (transfer
//! acceptance, which call to conference into) are asked on the same
//! terminal.

mod parse;
mod render;

use parse::{parse_line, truncate_input, Input};

use crate::directory::PhoneEntry;
use crate::exchange::{CallSummary, Exchange, Operator};
use std::io::{self, BufRead, Write};

pub const DEFAULT_MAX_INPUT_LEN: usize = 50;

const PROMPT: &str = "Enter command (help for list): ";

/// Line-oriented terminal; also answers the exchange's questions
struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    /// Print `prompt` and read one line. `None` at end of input.
    ///
    /// Bytes that are not UTF-8 are replaced rather than failing the read.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

impl<R: BufRead, W: Write> Operator for Terminal<R, W> {
    fn accept_transfer(&mut self, target: &PhoneEntry, transferer: &PhoneEntry) -> bool {
        let prompt = format!(
            "{}, accept transfer from {}? (y/n): ",
            target.name, transferer.name
        );
        match self.ask(&prompt) {
            Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read transfer answer");
                false
            }
        }
    }

    fn choose_call(&mut self, calls: &[CallSummary]) -> Option<usize> {
        let listed = calls
            .iter()
            .try_for_each(|call| writeln!(self.output, "  - {call}"));
        if let Err(e) = listed {
            tracing::warn!(error = %e, "Failed to list calls");
            return None;
        }
        match self.ask("Select call number: ") {
            Ok(Some(answer)) => answer.trim().parse().ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read call selection");
                None
            }
        }
    }
}

/// Whether the loop keeps reading after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Console<R, W> {
    exchange: Exchange,
    terminal: Terminal<R, W>,
    max_input_len: usize,
    commands_processed: usize,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(exchange: Exchange, input: R, output: W, max_input_len: usize) -> Self {
        Self {
            exchange,
            terminal: Terminal { input, output },
            max_input_len,
            commands_processed: 0,
        }
    }

    /// Run until `quit`/`exit` or end of input. Returns how many commands
    /// were processed.
    pub fn run(&mut self) -> io::Result<usize> {
        loop {
            let Some(raw) = self.terminal.ask(&format!("\n{PROMPT}"))? else {
                writeln!(self.terminal.output)?;
                break;
            };
            if self.handle_line(&raw)? == Flow::Quit {
                break;
            }
        }
        writeln!(
            self.terminal.output,
            "Total commands processed: {}",
            self.commands_processed
        )?;
        self.terminal.output.flush()?;
        Ok(self.commands_processed)
    }

    #[cfg(test)]
    pub fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.terminal.output
    }

    fn handle_line(&mut self, raw: &str) -> io::Result<Flow> {
        let (line, truncated) = truncate_input(raw, self.max_input_len);
        if truncated {
            writeln!(
                self.terminal.output,
                "Warning: command truncated to {} characters.",
                self.max_input_len
            )?;
        }
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        self.commands_processed += 1;

        match parse_line(&line) {
            Ok(Input::Exchange(command)) => {
                tracing::debug!(?command, "Dispatching command");
                match self.exchange.apply(command, &mut self.terminal) {
                    Ok(notice) => writeln!(self.terminal.output, "{notice}")?,
                    Err(rejection) => writeln!(self.terminal.output, "{rejection}")?,
                }
            }
            Ok(Input::Status) => render::write_status(&mut self.terminal.output, &self.exchange)?,
            Ok(Input::Help) => render::write_help(&mut self.terminal.output)?,
            Ok(Input::Quit) => return Ok(Flow::Quit),
            Err(e) => writeln!(self.terminal.output, "{e}")?,
        }
        Ok(Flow::Continue)
    }
}
