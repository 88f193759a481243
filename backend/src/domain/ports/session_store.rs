//! Port for the per-caller authenticated session record.
//!
//! An implementation is bound to one caller context (a browser session, a
//! desktop shell, a test) and stores at most one session for it.

use async_trait::async_trait;

use crate::domain::{AuthenticatedSession, SelectedRole, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionStoreError {
        /// Backing store could not be reached.
        Unavailable { message: String } => "session store unavailable: {message}",
        /// Session could not be written.
        Write { message: String } => "session write failed: {message}",
        /// Session could not be read.
        Read { message: String } => "session read failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Record `user` as authenticated under `role`, replacing any previous
    /// session for this caller.
    async fn persist(&self, user: &User, role: &SelectedRole) -> Result<(), SessionStoreError>;

    /// Current session for this caller, if one was persisted.
    async fn current(&self) -> Result<Option<AuthenticatedSession>, SessionStoreError>;

    /// Remove the caller's session. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), SessionStoreError>;
}
