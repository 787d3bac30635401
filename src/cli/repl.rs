// src/cli/repl.rs

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::{
    cli::error_line,
    core::{parser::Parser, tokenizer},
    models::EngineConfig,
};

/// How a REPL session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The stop word was entered.
    Stopped,
    /// The input was exhausted.
    EndOfInput,
}

/// Reads lines from `input` and executes them until the stop word or end of input.
///
/// Parse errors and handler failures are reported to `out` and the loop carries
/// on. Only I/O errors on `input`/`out` end the session early.
pub fn run<R, W>(parser: &Parser<'_>, config: &EngineConfig, input: R, out: &mut W) -> Result<SessionEnd>
where
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(out, "{}", config.prompt)?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            return Ok(SessionEnd::EndOfInput);
        };
        let line = line?;

        if is_stop(&line, &config.stop_word) {
            log::debug!("Stop word received, ending session.");
            return Ok(SessionEnd::Stopped);
        }

        if let Err(e) = parser.execute(&line, out) {
            log::debug!("Line '{}' failed: {:?}", line, e);
            write!(out, "{}", error_line(&e))?;
        }
    }
}

/// Runs one line, reporting a failure the same way the REPL does.
///
/// Returns `true` when the line ran successfully.
pub fn run_once<W: Write>(parser: &Parser<'_>, line: &str, out: &mut W) -> Result<bool> {
    match parser.execute(line, out) {
        Ok(()) => Ok(true),
        Err(e) => {
            write!(out, "{}", error_line(&e))?;
            Ok(false)
        }
    }
}

fn is_stop(line: &str, stop_word: &str) -> bool {
    tokenizer::tokenize(line)
        .first()
        .is_some_and(|first| first == stop_word)
}
