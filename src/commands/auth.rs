//! Account commands: login, register, confirm, logout, whoami

use colored::Colorize;

use crate::auth::{self, CognitoSessionProvider, Session};
use crate::config::{AuthProviderKind, Config};
use crate::error::{RagChatError, Result};

use super::prompt;

fn cognito_provider(config: &Config) -> Result<CognitoSessionProvider> {
    if config.auth.provider != AuthProviderKind::Cognito {
        return Err(RagChatError::Config(format!(
            "account commands need the cognito provider, but '{}' is configured \
             (unset RAGCHAT_TOKEN to use your account)",
            config.auth.provider
        ))
        .into());
    }
    Ok(CognitoSessionProvider::from_config(&config.auth)?)
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => prompt::password("Password: "),
    }
}

/// Signs in and stores the session in the OS keyring
pub async fn login(config: &Config, username: &str, password: Option<String>) -> Result<()> {
    let provider = cognito_provider(config)?;
    let password = password_or_prompt(password)?;

    let session = provider.login(username, &password).await?;
    println!("{} Signed in as {}", "✓".green(), session.username.cyan());
    Ok(())
}

/// Creates an account and explains how to confirm it
pub async fn register(
    config: &Config,
    username: &str,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    let provider = cognito_provider(config)?;
    let password = password_or_prompt(password)?;

    let outcome = provider.register(username, &password, email).await?;
    if outcome.user_confirmed {
        println!(
            "{} Account created. Sign in with {}",
            "✓".green(),
            format!("ragchat login -u {}", username).cyan()
        );
        return Ok(());
    }

    let destination = outcome
        .code_delivery
        .and_then(|d| d.destination)
        .unwrap_or_else(|| email.to_string());
    println!(
        "{} Account created. A confirmation code was sent to {}.",
        "✓".green(),
        destination
    );
    println!(
        "Confirm it with {}",
        format!("ragchat confirm -u {} --code <code>", username).cyan()
    );
    Ok(())
}

/// Confirms an account with the emailed code
pub async fn confirm(config: &Config, username: &str, code: &str) -> Result<()> {
    let provider = cognito_provider(config)?;
    provider.confirm_signup(username, code.trim()).await?;
    println!(
        "{} Account confirmed. Sign in with {}",
        "✓".green(),
        format!("ragchat login -u {}", username).cyan()
    );
    Ok(())
}

/// Signs out and forgets the stored session
pub async fn logout(config: &Config) -> Result<()> {
    let provider = cognito_provider(config)?;
    provider.logout().await?;
    println!("{} Signed out", "✓".green());
    Ok(())
}

/// Describes a session for `whoami`, one `label: value` pair per line
pub fn describe_session(session: &Session) -> Vec<(String, String)> {
    let mut lines = vec![("User".to_string(), session.username.clone())];

    match session.claims() {
        Ok(claims) => {
            lines.push(("Subject".to_string(), claims.sub));
            if let Some(email) = claims.email {
                lines.push(("Email".to_string(), email));
            }
        }
        Err(e) => tracing::debug!(error = %e, "Id token carries no readable claims"),
    }

    let expiry = session
        .expires_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    lines.push(("Expires".to_string(), expiry));
    lines
}

/// Shows who the current session belongs to
///
/// Refreshes an expired session on the way, like any backend call would.
pub async fn whoami(config: &Config) -> Result<()> {
    let provider = auth::init(&config.auth)?;
    let session = provider.current_session().await?;

    for (label, value) in describe_session(&session) {
        println!("{:>8}: {}", label.bold(), value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_error_contains, test_session};
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    #[test]
    fn test_describe_session_with_jwt_claims() {
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"1234-abcd","email":"alice@example.com"}"#);
        let mut session = test_session("alice");
        session.id_token = format!("header.{}.sig", payload);

        let lines = describe_session(&session);
        assert_eq!(lines[0], ("User".to_string(), "alice".to_string()));
        assert!(lines.contains(&("Subject".to_string(), "1234-abcd".to_string())));
        assert!(lines.contains(&("Email".to_string(), "alice@example.com".to_string())));
        assert_eq!(lines.last().unwrap().1, "never");
    }

    #[test]
    fn test_describe_session_with_opaque_token() {
        let lines = describe_session(&test_session("static"));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].1, "static");
    }

    #[test]
    fn test_account_commands_reject_static_provider() {
        let mut config = Config::default();
        config.auth.provider = AuthProviderKind::Static;
        config.auth.token = Some("dev-token".to_string());

        assert_error_contains(cognito_provider(&config), "cognito provider");
    }

    #[tokio::test]
    async fn test_whoami_with_static_provider() {
        let mut config = Config::default();
        config.auth.provider = AuthProviderKind::Static;
        config.auth.token = Some("dev-token".to_string());

        assert!(whoami(&config).await.is_ok());
    }
}
