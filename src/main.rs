//! ragchat - terminal client for the RAG Chat assistant
//!
#![doc = "ragchat - terminal client for the RAG Chat assistant"]
#![doc = "Main entry point for the ragchat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ragchat::cli::{ChatsCommand, Cli, Commands};
use ragchat::commands;
use ragchat::config::Config;

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        commands::report_error(&err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Login { username, password } => {
            tracing::info!("Starting login");
            commands::auth::login(&config, &username, password).await
        }
        Commands::Register {
            username,
            email,
            password,
        } => {
            tracing::info!("Starting registration");
            commands::auth::register(&config, &username, &email, password).await
        }
        Commands::Confirm { username, code } => {
            tracing::info!("Confirming account");
            commands::auth::confirm(&config, &username, &code).await
        }
        Commands::Logout => commands::auth::logout(&config).await,
        Commands::Whoami => commands::auth::whoami(&config).await,
        Commands::Chats { command } => {
            let client = commands::build_client(&config)?;
            match command {
                ChatsCommand::List { json } => commands::chats::list(&client, json).await,
                ChatsCommand::New { title } => commands::chats::create(&client, &title).await,
                ChatsCommand::Show { chat_id } => commands::chats::show(&client, &chat_id).await,
                ChatsCommand::Messages { chat_id } => {
                    commands::chats::messages(&client, &chat_id).await
                }
                ChatsCommand::Send { chat_id, content } => {
                    commands::chats::send(&client, &chat_id, &content).await
                }
            }
        }
        Commands::Chat { chat_id } => {
            tracing::info!(chat_id = %chat_id, "Starting interactive chat");
            let client = commands::build_client(&config)?;
            commands::chat::run_chat(&client, &chat_id).await
        }
        Commands::Upload { file } => {
            tracing::debug!("Uploading {}", file.display());
            let client = commands::build_client(&config)?;
            commands::knowledge::upload(&client, &file).await
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so command output on stdout stays pipeable.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "ragchat=debug"
    } else {
        "ragchat=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
