//! Port for resolving identity codes to directory users.
//!
//! Absence is a normal answer (`Ok(None)`); only transport or storage
//! failures surface as [`UserDirectoryError`].

use async_trait::async_trait;

use crate::domain::{IdentityCode, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Directory backend could not be reached.
        Connection { message: String } => "user directory connection failed: {message}",
        /// Directory query failed or returned an unusable record.
        Query { message: String } => "user directory query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find the user registered under `code`, if any.
    async fn find_by_identity(&self, code: &IdentityCode)
    -> Result<Option<User>, UserDirectoryError>;
}
