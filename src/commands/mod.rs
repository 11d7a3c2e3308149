/*!
Command handlers for the CLI

Each submodule handles one group of subcommands:

- `auth`     : login, register, confirm, logout, whoami
- `chats`    : list, create, show and message chats
- `chat`     : the interactive chat loop
- `knowledge`: PDF uploads

Handlers return errors to `main`, which renders them with [`report_error`].
*/

use colored::Colorize;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{is_auth_failure, Result};

pub mod auth;
pub mod chat;
pub mod chats;
pub mod knowledge;
pub mod special_commands;

mod prompt;
mod render;

/// Builds the backend client and the session provider it reads tokens from
///
/// # Errors
///
/// Returns an error when the session provider or HTTP client cannot be built.
pub fn build_client(config: &Config) -> Result<ApiClient> {
    let session = crate::auth::init(&config.auth)?;
    Ok(ApiClient::new(&config.api, session)?)
}

/// Renders an error as one user-facing line on stderr
///
/// Errors a fresh sign-in could fix get a hint pointing at `ragchat login`.
pub fn report_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", "Error:".red().bold(), err);
    if is_auth_failure(err) {
        eprintln!(
            "Run {} to sign in.",
            "ragchat login -u <username>".cyan()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthProviderKind;

    #[test]
    fn test_build_client_with_static_provider() {
        let mut config = Config::default();
        config.api.base_url = "http://backend.test/".to_string();
        config.auth.provider = AuthProviderKind::Static;
        config.auth.token = Some("dev-token".to_string());

        let client = build_client(&config).unwrap();
        assert_eq!(client.base_url(), "http://backend.test");
    }

    #[test]
    fn test_build_client_without_client_id_fails() {
        assert!(build_client(&Config::default()).is_err());
    }
}
