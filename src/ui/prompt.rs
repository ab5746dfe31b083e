use crate::error::Result;
use colored::*;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const EXIT_COMMANDS: [&str; 3] = ["quit", "exit", "bye"];

/// Line-oriented stdin reader for the interactive loops.
pub struct LineReader {
    lines: Lines<BufReader<Stdin>>,
}

impl LineReader {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `prompt` and read one trimmed line; `None` at end of input.
    pub async fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("\n{}", prompt.bold());
        io::stdout().flush()?;

        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_exit_command(input: &str) -> bool {
    let lowered = input.trim().to_lowercase();
    EXIT_COMMANDS.contains(&lowered.as_str())
}
