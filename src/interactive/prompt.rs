//! Terminal input seam: free text, masked text, and single-choice menus.

use std::io::{self, BufRead};

use colored::Colorize;
use console::{Key, Term};
use thiserror::Error;

/// Outcome of an interactive read that did not produce a value.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The user cancelled (Ctrl+C, Esc, or end of input).
    #[error("user quit")]
    Quit,

    /// The terminal could not be read.
    #[error(transparent)]
    Io(io::Error),
}

impl From<io::Error> for PromptError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::Interrupted {
            Self::Quit
        } else {
            Self::Io(e)
        }
    }
}

/// Asks the user for input.
pub trait Prompter {
    /// Read a line of text. `initial` is offered as the editable starting value.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Quit`] when the user cancels.
    fn input(&mut self, message: &str, initial: &str) -> Result<String, PromptError>;

    /// Read a line without echoing it.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Quit`] when the user cancels.
    fn secret(&mut self, message: &str) -> Result<String, PromptError>;

    /// Let the user pick one of `items`; returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Quit`] when the user cancels.
    fn select(&mut self, title: &str, items: &[&str]) -> Result<usize, PromptError>;
}

/// [`Prompter`] on the process terminal.
///
/// Uses key-driven editing and arrow-key menus on a TTY, and plain line
/// reads otherwise (where end of input counts as quitting).
pub struct TermPrompter {
    term: Term,
}

impl TermPrompter {
    /// Prompter on standard output/input.
    #[must_use]
    pub fn stdout() -> Self {
        Self { term: Term::stdout() }
    }

    fn ask(&self, message: &str) -> io::Result<()> {
        self.term.write_str(&format!("{} {} ", "?".green().bold(), message.bold()))
    }

    fn select_interactive(&self, title: &str, items: &[&str]) -> Result<usize, PromptError> {
        let mut selected = 0;
        self.term.write_line(&format!("{} {}", "?".green().bold(), title.bold()))?;
        self.term.hide_cursor()?;
        let result = loop {
            for (i, item) in items.iter().enumerate() {
                if i == selected {
                    self.term.write_line(&format!("{} {}", ">".cyan(), item.cyan()))?;
                } else {
                    self.term.write_line(&format!("  {item}"))?;
                }
            }
            let key = self.term.read_key();
            self.term.clear_last_lines(items.len())?;
            match key {
                Ok(Key::ArrowUp | Key::Char('k')) => {
                    selected = selected.checked_sub(1).unwrap_or(items.len() - 1);
                }
                Ok(Key::ArrowDown | Key::Tab | Key::Char('j')) => {
                    selected = (selected + 1) % items.len();
                }
                Ok(Key::Enter) => break Ok(selected),
                Ok(Key::Escape) => break Err(PromptError::Quit),
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            }
        };
        self.term.show_cursor()?;
        if let Ok(index) = result {
            self.term.clear_last_lines(1)?;
            self.term.write_line(&format!(
                "{} {} {}",
                "?".green().bold(),
                title.bold(),
                items[index].cyan()
            ))?;
        }
        result
    }

    fn select_plain(&self, title: &str, items: &[&str]) -> Result<usize, PromptError> {
        self.term.write_line(&format!("{} {}", "?".green().bold(), title.bold()))?;
        for (i, item) in items.iter().enumerate() {
            self.term.write_line(&format!("  {}) {item}", i + 1))?;
        }
        loop {
            self.ask(&format!("[1-{}]", items.len()))?;
            let line = read_stdin_line()?;
            let choice = line.trim();
            if choice.is_empty() {
                return Ok(0);
            }
            match choice.parse::<usize>() {
                Ok(n) if (1..=items.len()).contains(&n) => return Ok(n - 1),
                _ => self.term.write_line(&format!("{} {choice}", "✗".red()))?,
            }
        }
    }
}

impl Prompter for TermPrompter {
    fn input(&mut self, message: &str, initial: &str) -> Result<String, PromptError> {
        self.ask(message)?;
        if self.term.is_term() {
            Ok(self.term.read_line_initial_text(initial)?)
        } else {
            let line = read_stdin_line()?;
            let line = line.trim_end_matches(['\r', '\n']);
            Ok(if line.is_empty() { initial.to_string() } else { line.to_string() })
        }
    }

    fn secret(&mut self, message: &str) -> Result<String, PromptError> {
        self.ask(message)?;
        if self.term.is_term() {
            Ok(self.term.read_secure_line()?)
        } else {
            Ok(read_stdin_line()?.trim_end_matches(['\r', '\n']).to_string())
        }
    }

    fn select(&mut self, title: &str, items: &[&str]) -> Result<usize, PromptError> {
        if items.is_empty() {
            return Err(PromptError::Io(io::Error::new(io::ErrorKind::InvalidInput, "empty menu")));
        }
        if self.term.is_term() {
            self.select_interactive(title, items)
        } else {
            self.select_plain(title, items)
        }
    }
}

/// Read one line from stdin; end of input is a quit.
fn read_stdin_line() -> Result<String, PromptError> {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(PromptError::Quit);
    }
    Ok(line)
}
