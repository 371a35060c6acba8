//! Interactive read-eval loop.

use anyhow::Result;
use async_trait::async_trait;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

/// Answers one line of user input.
#[async_trait]
pub trait TurnHandler: Send {
    async fn handle(&mut self, input: &str) -> Result<String>;
}

/// What a line typed at the prompt means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleInput<'a> {
    Exit,
    Blank,
    Query(&'a str),
}

pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

pub fn classify_input(line: &str) -> ConsoleInput<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        ConsoleInput::Blank
    } else if is_exit_command(trimmed) {
        ConsoleInput::Exit
    } else {
        ConsoleInput::Query(trimmed)
    }
}

/// Run the console until `exit`, `quit`, Ctrl-C, or Ctrl-D.
///
/// A failed turn is printed and the loop continues.
pub async fn run_console(handler: &mut dyn TurnHandler, title: &str, hint: &str) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("--- {title} (type 'quit' to exit) ---");
    if !hint.is_empty() {
        println!("{hint}");
    }
    println!();

    loop {
        let line = match rl.readline("You: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        };

        let query = match classify_input(&line) {
            ConsoleInput::Blank => continue,
            ConsoleInput::Exit => break,
            ConsoleInput::Query(query) => query,
        };
        if let Err(e) = rl.add_history_entry(query) {
            debug!(error = %e, "failed to record history entry");
        }

        match handler.handle(query).await {
            Ok(answer) => println!("Assistant: {answer}\n"),
            Err(e) => eprintln!("Error: {e:#}\n"),
        }
    }

    println!("Goodbye!");
    Ok(())
}
