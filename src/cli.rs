//! Command-line interface definition for ragchat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for signing in, managing chats, talking to the
//! assistant and feeding the knowledge base.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ragchat - talk to the RAG Chat assistant from the terminal
///
/// Sign in with your user pool account, keep named chats with the assistant
/// and upload PDF documents into the knowledge base it draws on.
#[derive(Parser, Debug, Clone)]
#[command(name = "ragchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the backend base URL
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for ragchat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sign in and store the session in the OS keyring
    Login {
        /// Username or email
        #[arg(short, long)]
        username: String,

        /// Password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create a new account
    Register {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Email address used for the confirmation code
        #[arg(short, long)]
        email: String,

        /// Password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Confirm a new account with the emailed code
    Confirm {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Confirmation code
        #[arg(long)]
        code: String,
    },

    /// Sign out everywhere and forget the stored session
    Logout,

    /// Show who the current session belongs to
    Whoami,

    /// Manage chats
    Chats {
        /// Chat subcommand
        #[command(subcommand)]
        command: ChatsCommand,
    },

    /// Open an interactive conversation in a chat
    Chat {
        /// Chat identifier
        chat_id: String,
    },

    /// Upload a PDF document into the knowledge base
    Upload {
        /// Path to the PDF file
        file: PathBuf,
    },
}

/// Chat management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ChatsCommand {
    /// List your chats
    List {
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Create a new chat
    New {
        /// Chat title
        title: String,
    },

    /// Show a single chat
    Show {
        /// Chat identifier
        chat_id: String,
    },

    /// Print the message history of a chat
    Messages {
        /// Chat identifier
        chat_id: String,
    },

    /// Send one message and print the assistant reply
    Send {
        /// Chat identifier
        chat_id: String,

        /// Message content
        content: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            backend_url: None,
            command: Commands::Whoami,
        }
    }
}
