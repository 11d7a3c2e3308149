//! Terminal rendering of messages and conversation entries

use colored::Colorize;

use crate::api::{Author, Message};
use crate::conversation::{Delivery, Entry};

fn author_label(author: Author) -> String {
    match author {
        Author::User => "you".green().bold().to_string(),
        Author::Assistant => "assistant".cyan().bold().to_string(),
    }
}

fn time_label(message: &Message) -> String {
    message
        .sent_at()
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Prints a stored message
pub fn print_message(message: &Message) {
    println!(
        "{} {}\n{}\n",
        author_label(message.author),
        time_label(message).dimmed(),
        message.content
    );
}

/// Prints a conversation entry with its delivery state
pub fn print_entry(entry: &Entry) {
    let status = match &entry.delivery {
        Delivery::Confirmed => String::new(),
        Delivery::Pending => "sending...".dimmed().to_string(),
        Delivery::Failed(reason) => format!("not delivered: {}", reason).red().to_string(),
    };
    println!(
        "{} {} {}\n{}\n",
        author_label(entry.message.author),
        time_label(&entry.message).dimmed(),
        status,
        entry.message.content
    );
}
