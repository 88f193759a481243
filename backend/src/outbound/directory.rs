//! In-memory user directory keyed by identity code.
//!
//! Stands in for the CRM contact search during development and tests. The
//! directory can be seeded from a JSON file:
//!
//! ```json
//! [
//!   {
//!     "nationalCode": "0499370899",
//!     "user": { "id": "1024", "firstName": "Ada", "lastName": "Lovelace", "role": "Customer" }
//!   }
//! ]
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{IdentityCode, User};

/// Errors raised while loading a directory seed file.
#[derive(Debug, thiserror::Error)]
pub enum DirectorySeedError {
    #[error("failed to read directory seed at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse directory seed at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("identity code {code} appears more than once in the directory seed")]
    Duplicate { code: String },
}

/// One seeded directory entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub national_code: IdentityCode,
    pub user: User,
}

/// Thread-safe identity-code to user map.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<IdentityCode, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from entries, rejecting duplicate identity codes.
    pub fn from_entries(
        entries: impl IntoIterator<Item = DirectoryEntry>,
    ) -> Result<Self, DirectorySeedError> {
        let mut users = HashMap::new();
        for DirectoryEntry {
            national_code,
            user,
        } in entries
        {
            if users.contains_key(&national_code) {
                return Err(DirectorySeedError::Duplicate {
                    code: national_code.masked(),
                });
            }
            users.insert(national_code, user);
        }
        Ok(Self {
            users: RwLock::new(users),
        })
    }

    /// Load a directory from a JSON seed file.
    pub fn from_seed_file(path: &Path) -> Result<Self, DirectorySeedError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DirectorySeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<DirectoryEntry> =
            serde_json::from_str(&raw).map_err(|source| DirectorySeedError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let directory = Self::from_entries(entries)?;
        info!(path = %path.display(), users = directory.len(), "seeded user directory");
        Ok(directory)
    }

    /// Register or replace the user for `code`.
    pub fn insert(&self, code: IdentityCode, user: User) -> Result<(), UserDirectoryError> {
        self.users
            .write()
            .map_err(|_| UserDirectoryError::query("directory lock poisoned"))?
            .insert(code, user);
        Ok(())
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.users.read().map(|users| users.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_identity(
        &self,
        code: &IdentityCode,
    ) -> Result<Option<User>, UserDirectoryError> {
        let users = self
            .users
            .read()
            .map_err(|_| UserDirectoryError::query("directory lock poisoned"))?;
        Ok(users.get(code).cloned())
    }
}
