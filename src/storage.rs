use std::sync::Mutex;

use keyring::Entry;

/// Keyring service name for the persisted session token.
const KEYRING_SERVICE: &str = "crmctl";

/// Keyring entry name for the persisted session token.
const KEYRING_ENTRY: &str = "API Session Token";

/// Possible failures while persisting the session token.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Durable key-value storage for the session token.
///
/// The client owns the token in memory; implementations of this trait only
/// decide where it survives between runs. Absence means unauthenticated.
pub trait TokenStore: Send + Sync {
    /// Reads the stored token, if any.
    fn get(&self) -> Option<String>;

    /// Stores a non-empty token, replacing any previous value.
    fn set(&self, token: &str) -> Result<(), StorageError>;

    /// Removes the stored token. Removing an absent token is not an error.
    fn remove(&self) -> Result<(), StorageError>;
}

/// Token storage backed by the operating system keychain.
pub struct KeyringStore {
    entry: Entry,
}

impl KeyringStore {
    /// Opens the keyring entry used for the session token.
    pub fn new() -> Result<Self, StorageError> {
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_ENTRY)?;
        Ok(Self { entry })
    }
}

impl TokenStore for KeyringStore {
    fn get(&self) -> Option<String> {
        self.entry.get_password().ok()
    }

    fn set(&self, token: &str) -> Result<(), StorageError> {
        self.entry.set_password(token)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        match self.entry.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Process-local token storage.
///
/// Nothing survives the process; useful for tests and one-off sessions.
#[derive(Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryStore {
    fn get(&self) -> Option<String> {
        self.token.lock().expect("token lock poisoned").clone()
    }

    fn set(&self, token: &str) -> Result<(), StorageError> {
        *self.token.lock().expect("token lock poisoned") = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        *self.token.lock().expect("token lock poisoned") = None;
        Ok(())
    }
}
