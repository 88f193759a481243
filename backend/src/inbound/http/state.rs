//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::ports::{UserDirectory, UserEnricher};
use crate::outbound::sessions::SessionRegistry;

/// Dependency bundle for HTTP handlers.
///
/// The session store is per caller, so handlers build login and gate
/// services per request from `sessions` and the cookie's session key.
#[derive(Clone)]
pub struct HttpState {
    pub directory: Arc<dyn UserDirectory>,
    pub enricher: Arc<dyn UserEnricher>,
    pub sessions: Arc<SessionRegistry>,
    /// Cancelled when the server shuts down; in-flight logins stop with it.
    pub shutdown: CancellationToken,
}

impl HttpState {
    /// Construct state from port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use identity_gate::domain::ports::PassThroughEnricher;
    /// use identity_gate::inbound::http::state::HttpState;
    /// use identity_gate::outbound::directory::InMemoryUserDirectory;
    /// use identity_gate::outbound::sessions::SessionRegistry;
    /// use mockable::DefaultClock;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(InMemoryUserDirectory::new()),
    ///     Arc::new(PassThroughEnricher),
    ///     Arc::new(SessionRegistry::new(Arc::new(DefaultClock))),
    /// );
    /// assert!(!state.shutdown.is_cancelled());
    /// ```
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        enricher: Arc<dyn UserEnricher>,
        sessions: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            directory,
            enricher,
            sessions,
            shutdown: CancellationToken::new(),
        }
    }

    /// Replace the shutdown token.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}
