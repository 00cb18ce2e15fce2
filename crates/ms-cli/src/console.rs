//! Terminal prompts for credentials and confirmations

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ms_client_api::{ConfirmationProvider, PasswordProvider, PromptError, PromptResult};

/// Reads secrets without echo and confirmations as plain lines
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompts;

impl PasswordProvider for ConsolePrompts {
    fn password(&self, _email: &str) -> PromptResult<String> {
        read_masked("Password: ")
    }

    fn one_time_code(&self, _email: &str) -> PromptResult<String> {
        read_masked("Email code: ")
    }
}

impl ConfirmationProvider for ConsolePrompts {
    fn ask(&self, prompt: &str) -> PromptResult<String> {
        print!("{}", prompt);
        io::stdout().flush().map_err(io_error)?;
        read_answer(&mut io::stdin().lock(), prompt)
    }
}

/// One line from `input` without its line ending; EOF means nobody is there
/// to answer
pub fn read_answer(input: &mut impl BufRead, prompt: &str) -> PromptResult<String> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => Err(PromptError::NonInteractive(prompt.trim().to_string())),
        Ok(_) => Ok(line.trim_end_matches(['\r', '\n']).to_string()),
        Err(e) => Err(io_error(e)),
    }
}

fn read_masked(prompt: &str) -> PromptResult<String> {
    if !io::stdin().is_terminal() {
        return Err(PromptError::NonInteractive(
            prompt.trim_end_matches(": ").to_lowercase(),
        ));
    }

    eprint!("{}", prompt);
    io::stderr().flush().map_err(io_error)?;

    enable_raw_mode().map_err(io_error)?;
    let secret = read_secret_keys();
    // Always leave raw mode, even when reading failed
    let restored = disable_raw_mode();
    eprintln!();

    restored.map_err(io_error)?;
    secret
}

fn read_secret_keys() -> PromptResult<String> {
    let mut secret = String::new();
    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event::read().map_err(io_error)?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(PromptError::Io("interrupted".to_string()));
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    }
}

fn io_error(e: io::Error) -> PromptError {
    PromptError::Io(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_answer_strips_line_ending_only() {
        let mut input = Cursor::new("Benchmark NLP \r\n");
        assert_eq!(read_answer(&mut input, "confirm: ").unwrap(), "Benchmark NLP ");
    }

    #[test]
    fn test_read_answer_eof_is_non_interactive() {
        let mut input = Cursor::new("");
        assert!(matches!(
            read_answer(&mut input, "confirm: "),
            Err(PromptError::NonInteractive(_))
        ));
    }

    #[test]
    fn test_read_answer_empty_line() {
        let mut input = Cursor::new("\n");
        assert_eq!(read_answer(&mut input, "(y/n)").unwrap(), "");
    }
}
