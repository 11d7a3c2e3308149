//! Special commands parser for the interactive chat loop
//!
//! Lines starting with `/` control the session instead of being sent to the
//! assistant. Command names are case-insensitive; arguments keep their case.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands available in the interactive chat loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Reprint the conversation
    History,

    /// Re-fetch the message snapshot from the backend
    Refresh,

    /// Show the chat and how many sends are in flight
    Status,

    /// Upload a PDF into the knowledge base
    Upload(PathBuf),

    /// Display help information
    Help,

    /// Leave the chat
    Exit,

    /// Not a special command; the input is a message
    None,
}

/// Parse a line of user input into a special command
///
/// # Errors
///
/// Returns [`CommandError::UnknownCommand`] for an unrecognised `/` command
/// and [`CommandError::MissingArgument`] for `/upload` without a path.
///
/// # Examples
///
/// ```
/// use ragchat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/EXIT").unwrap(), SpecialCommand::Exit);
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, arg)) => (name.to_lowercase(), arg.trim()),
        None => (lower, ""),
    };

    match name.as_str() {
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/history" => Ok(SpecialCommand::History),
        "/refresh" => Ok(SpecialCommand::Refresh),
        "/status" => Ok(SpecialCommand::Status),
        "/upload" if arg.is_empty() => Err(CommandError::MissingArgument {
            command: "/upload".to_string(),
            usage: "/upload <path-to-pdf>".to_string(),
        }),
        "/upload" => Ok(SpecialCommand::Upload(PathBuf::from(arg))),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Display help for the interactive chat loop
pub fn print_help() {
    println!(
        r#"
Chat Commands
=============

  /history        - Reprint the conversation
  /refresh        - Reload messages from the server
  /status         - Show the chat and pending sends
  /upload <file>  - Add a PDF to the knowledge base
  /help           - Show this help message
  /?              - Same as /help
  exit, /exit     - Leave the chat (Ctrl-D works too)

Anything else is sent to the assistant.
"#
    );
}
