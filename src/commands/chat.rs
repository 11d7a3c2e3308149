//! Interactive chat loop
//!
//! Loads a chat's snapshot, then reads lines with rustyline. Each message is
//! shown as pending right away and settled when the backend answers; a
//! failed send stays on screen marked as not delivered and the loop goes on.

use std::path::Path;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::api::{ApiClient, ApiError};
use crate::conversation::Conversation;
use crate::error::Result;

use super::render;
use super::special_commands::{parse_special_command, print_help, SpecialCommand};

/// Sends `content` through `conversation`, settling its pending entry
///
/// On failure the entry stays in the conversation marked failed and the
/// error is returned.
pub async fn send_tracked(
    client: &ApiClient,
    conversation: &mut Conversation,
    content: &str,
) -> std::result::Result<(), ApiError> {
    let chat_id = conversation.chat().chat_id.clone();
    let id = conversation.push_pending(content);

    match client.send_message(&chat_id, content).await {
        Ok(reply) => {
            conversation.resolve(id, reply);
            Ok(())
        }
        Err(e) => {
            conversation.fail(id, e.to_string());
            Err(e)
        }
    }
}

fn print_conversation(conversation: &Conversation) {
    println!(
        "\n{} {}\n",
        "Chat:".bold(),
        conversation.title().cyan().bold()
    );
    if conversation.entries().is_empty() {
        println!("{}\n", "No messages yet. Say hello!".dimmed());
    }
    for entry in conversation.entries() {
        render::print_entry(entry);
    }
}

async fn reload(client: &ApiClient, chat_id: &str) -> Result<Conversation> {
    let chat = client.get_chat(chat_id).await?;
    let messages = client.get_messages(chat_id).await?;
    Ok(Conversation::from_history(chat, messages))
}

async fn upload(client: &ApiClient, path: &Path) {
    match client.upload_knowledge(path).await {
        Ok(()) => println!(
            "{} Added {} to the knowledge base\n",
            "✓".green(),
            path.display()
        ),
        Err(e) => eprintln!("{} {}\n", "Upload failed:".red(), e),
    }
}

/// Runs the interactive loop for one chat
pub async fn run_chat(client: &ApiClient, chat_id: &str) -> Result<()> {
    let mut conversation = reload(client, chat_id).await?;
    print_conversation(&conversation);
    println!(
        "{}",
        "Type a message, /help for commands, exit to leave.".dimmed()
    );

    let mut rl = DefaultEditor::new()?;
    let prompt = format!("{} ", ">".cyan().bold());

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match parse_special_command(trimmed) {
                    Ok(SpecialCommand::None) => {}
                    Ok(SpecialCommand::Exit) => break,
                    Ok(SpecialCommand::Help) => {
                        print_help();
                        continue;
                    }
                    Ok(SpecialCommand::History) => {
                        print_conversation(&conversation);
                        continue;
                    }
                    Ok(SpecialCommand::Refresh) => {
                        match reload(client, chat_id).await {
                            Ok(fresh) => {
                                conversation = fresh;
                                print_conversation(&conversation);
                            }
                            Err(e) => eprintln!("{} {:#}\n", "Refresh failed:".red(), e),
                        }
                        continue;
                    }
                    Ok(SpecialCommand::Status) => {
                        println!(
                            "{} ({}), {} message(s), {} pending\n",
                            conversation.title().bold(),
                            conversation.chat().chat_id.cyan(),
                            conversation.entries().len(),
                            conversation.pending_count()
                        );
                        continue;
                    }
                    Ok(SpecialCommand::Upload(path)) => {
                        upload(client, &path).await;
                        continue;
                    }
                    Err(e) => {
                        eprintln!("{}\n", e.to_string().yellow());
                        continue;
                    }
                }

                match send_tracked(client, &mut conversation, trimmed).await {
                    Ok(()) => {
                        if let Some(reply) = conversation.entries().last() {
                            render::print_entry(reply);
                        }
                    }
                    Err(e) => {
                        eprintln!("{} {}", "Message not delivered:".red(), e);
                        if e.is_auth_error() {
                            eprintln!(
                                "Run {} in another terminal, then try again.",
                                "ragchat login".cyan()
                            );
                        }
                        println!();
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    tracing::debug!(chat_id = %chat_id, "Left interactive chat");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::auth::{AuthError, MockSessionProvider};
    use crate::config::ApiConfig;
    use crate::conversation::Delivery;
    use crate::test_utils::sample_chat;

    #[tokio::test]
    async fn test_send_tracked_marks_entry_failed_without_session() {
        let mut provider = MockSessionProvider::new();
        provider
            .expect_id_token()
            .returning(|| Err(AuthError::NoSession));
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: None,
        };
        let client = ApiClient::new(&config, Arc::new(provider)).unwrap();

        let mut conversation = Conversation::from_history(sample_chat("c1", "Notes"), Vec::new());
        let err = send_tracked(&client, &mut conversation, "hello")
            .await
            .unwrap_err();

        assert!(err.is_auth_error());
        assert_eq!(conversation.entries().len(), 1);
        assert!(matches!(
            conversation.entries()[0].delivery,
            Delivery::Failed(_)
        ));
        assert_eq!(conversation.pending_count(), 0);
    }
}
