//! Chat management commands

use colored::Colorize;
use prettytable::{format, Table};

use crate::api::{ApiClient, Chat};
use crate::error::Result;

use super::render;

const TITLE_WIDTH: usize = 40;

fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_WIDTH {
        let head: String = title.chars().take(TITLE_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}

fn format_activity(chat: &Chat) -> String {
    chat.last_activity()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Builds the chat list table
pub fn chats_table(chats: &[Chat]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "Title".bold(),
        "Messages".bold(),
        "Last Activity".bold()
    ]);

    for chat in chats {
        table.add_row(prettytable::row![
            chat.chat_id.cyan(),
            truncate_title(&chat.display_title()),
            chat.message_count,
            format_activity(chat)
        ]);
    }
    table
}

/// Lists the user's chats as a table or JSON
pub async fn list(client: &ApiClient, json: bool) -> Result<()> {
    let chats = client.get_chats().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chats)?);
        return Ok(());
    }

    if chats.is_empty() {
        println!("{}", "No chats yet.".yellow());
        println!(
            "Create one with {}",
            "ragchat chats new \"<title>\"".cyan()
        );
        return Ok(());
    }

    println!("\nChats:");
    chats_table(&chats).printstd();
    println!();
    println!("Use {} to open a chat.", "ragchat chat <ID>".cyan());
    println!();
    Ok(())
}

/// Creates a chat and prints its id
pub async fn create(client: &ApiClient, title: &str) -> Result<()> {
    let chat = client.create_chat(title.trim()).await?;
    println!(
        "{} Created chat {} ({})",
        "✓".green(),
        chat.display_title().bold(),
        chat.chat_id.cyan()
    );
    Ok(())
}

/// Shows one chat's details
pub async fn show(client: &ApiClient, chat_id: &str) -> Result<()> {
    let chat = client.get_chat(chat_id).await?;
    println!("{:>14}: {}", "ID".bold(), chat.chat_id.cyan());
    println!("{:>14}: {}", "Title".bold(), chat.display_title());
    println!("{:>14}: {}", "Messages".bold(), chat.message_count);
    if let Some(created) = chat.created_at {
        println!(
            "{:>14}: {}",
            "Created".bold(),
            created.format("%Y-%m-%d %H:%M")
        );
    }
    println!("{:>14}: {}", "Last activity".bold(), format_activity(&chat));
    Ok(())
}

/// Prints a chat's message history, oldest first
pub async fn messages(client: &ApiClient, chat_id: &str) -> Result<()> {
    let messages = client.get_messages(chat_id).await?;
    if messages.is_empty() {
        println!("{}", "No messages yet.".yellow());
        return Ok(());
    }
    for message in &messages {
        render::print_message(message);
    }
    Ok(())
}

/// Sends one message and prints the reply
pub async fn send(client: &ApiClient, chat_id: &str, content: &str) -> Result<()> {
    let reply = client.send_message(chat_id, content).await?;
    render::print_message(&reply);
    Ok(())
}
