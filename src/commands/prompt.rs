//! Terminal prompts
//!
//! Passwords are read through rustyline with a highlighter that paints every
//! typed character as `*`, so the secret never shows on screen and never
//! lands in the line history.

use std::borrow::Cow::{self, Owned};

use rustyline::completion::Completer;
use rustyline::config::Configurer;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{ColorMode, Editor, Helper};

use crate::error::{RagChatError, Result};

struct MaskingHighlighter;

impl Highlighter for MaskingHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Owned("*".repeat(line.chars().count()))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Completer for MaskingHighlighter {
    type Candidate = String;
}

impl Hinter for MaskingHighlighter {
    type Hint = String;
}

impl Validator for MaskingHighlighter {}

impl Helper for MaskingHighlighter {}

/// Reads a password without echoing it
///
/// # Errors
///
/// Returns an error when the terminal cannot be read or the password is empty.
pub fn password(prompt: &str) -> Result<String> {
    let mut rl: Editor<MaskingHighlighter, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(MaskingHighlighter));
    rl.set_color_mode(ColorMode::Forced);
    rl.set_auto_add_history(false);

    let password = rl.readline(prompt)?;
    if password.is_empty() {
        return Err(RagChatError::InvalidInput("password must not be empty".to_string()).into());
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masking_highlighter_hides_every_character() {
        let highlighter = MaskingHighlighter;
        assert_eq!(highlighter.highlight("hunter2", 0), "*******");
        assert_eq!(highlighter.highlight("pässwörd", 0), "********");
        assert_eq!(highlighter.highlight("", 0), "");
        assert!(highlighter.highlight_char("x", 1, false));
    }
}
