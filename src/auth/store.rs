//! Session persistence
//!
//! The signed-in session is kept in the operating system's native credential
//! store (Keychain on macOS, Secret Service on Linux, Windows Credential
//! Manager on Windows) so it survives between invocations. Sessions are
//! serialized to JSON before storage and deserialized on load.
//!
//! [`MemorySessionStore`] keeps the session in process memory instead; it is
//! used by tests and by callers that do not want anything written to disk.

use std::sync::Mutex;

use super::{AuthError, Session};

/// Storage for at most one signed-in session
pub trait SessionStore: Send + Sync {
    /// Loads the stored session, `Ok(None)` when nobody is signed in
    fn load(&self) -> Result<Option<Session>, AuthError>;

    /// Replaces the stored session
    fn save(&self, session: &Session) -> Result<(), AuthError>;

    /// Forgets the stored session; a no-op when nothing is stored
    fn clear(&self) -> Result<(), AuthError>;
}

/// Session store backed by the OS keyring.
///
/// One entry per user pool app client, so signing in against a different
/// pool never clobbers an existing session.
///
/// # Examples
///
/// ```no_run
/// use ragchat::auth::{KeyringSessionStore, SessionStore};
///
/// let store = KeyringSessionStore::new("my-app-client-id");
/// match store.load().unwrap() {
///     Some(session) => println!("Signed in as {}", session.username),
///     None => println!("Not signed in"),
/// }
/// ```
pub struct KeyringSessionStore {
    account: String,
}

impl KeyringSessionStore {
    /// Creates a store for sessions issued to the given app client
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
        }
    }

    /// Builds the keyring service name for an app client.
    ///
    /// The name is prefixed with `ragchat-` to avoid collisions with other
    /// applications that use the same keyring.
    fn service_name(account: &str) -> String {
        format!("ragchat-{}", account)
    }

    fn entry(&self) -> Result<keyring::Entry, AuthError> {
        let service = Self::service_name(&self.account);
        keyring::Entry::new(&service, &self.account).map_err(AuthError::Keyring)
    }
}

impl SessionStore for KeyringSessionStore {
    fn load(&self) -> Result<Option<Session>, AuthError> {
        match self.entry()?.get_password() {
            Ok(json_str) => {
                let session: Session = serde_json::from_str(&json_str)?;
                Ok(Some(session))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AuthError::Keyring(e)),
        }
    }

    fn save(&self, session: &Session) -> Result<(), AuthError> {
        let json_str = serde_json::to_string(session)?;
        self.entry()?
            .set_password(&json_str)
            .map_err(AuthError::Keyring)?;
        tracing::debug!(username = %session.username, "Stored session in keyring");
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match self.entry()?.delete_password() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(AuthError::Keyring(e)),
        }
    }
}

/// Session store that lives only as long as the process.
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `session`
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, AuthError> {
        let guard = self.session.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> Result<(), AuthError> {
        let mut guard = self.session.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        let mut guard = self.session.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}
