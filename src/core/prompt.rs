//! Secret value prompt.
//!
//! Interactive mode asks for each secret's value with hidden input. When
//! stdin is not a terminal, one line is read per secret instead.

use std::io::{self, BufRead, IsTerminal};

use dialoguer::Password;
use zeroize::Zeroizing;

use crate::error::Result;

/// Source of secret values for interactive mode.
pub trait ValuePrompt {
    /// Ask for the value of `name`.
    ///
    /// Returns `None` when no value was given (empty input or end of input).
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal or stdin cannot be read.
    fn ask(&mut self, name: &str) -> Result<Option<Zeroizing<String>>>;
}

/// Prompts on the terminal, or reads piped stdin line by line.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl ValuePrompt for TerminalPrompt {
    fn ask(&mut self, name: &str) -> Result<Option<Zeroizing<String>>> {
        let value = if io::stdin().is_terminal() {
            Zeroizing::new(
                Password::new()
                    .with_prompt(format!("Value for {} (empty to skip)", name))
                    .allow_empty_password(true)
                    .interact()?,
            )
        } else {
            let mut line = Zeroizing::new(String::new());
            if io::stdin().lock().read_line(&mut line)? == 0 {
                return Ok(None);
            }
            Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_string())
        };

        Ok((!value.is_empty()).then_some(value))
    }
}
