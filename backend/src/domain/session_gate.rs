//! Session gate and logout services.
//!
//! The gate is consulted on every initial page load, independent of any
//! login submission. It only reads the session store. Logout lives beside it
//! because it is the one operation that ends what the gate observes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::LandingRoute;
use crate::domain::ports::{SessionGate, SessionStore, SessionStoreError};

/// Read-side session query bound to one caller's session store.
pub struct SessionGateService<S: ?Sized> {
    sessions: Arc<S>,
}

impl<S: ?Sized> SessionGateService<S> {
    pub fn new(sessions: Arc<S>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl<S> SessionGate for SessionGateService<S>
where
    S: SessionStore + ?Sized,
{
    async fn is_authenticated(&self) -> Result<bool, SessionStoreError> {
        Ok(self.sessions.current().await?.is_some())
    }

    async fn landing_route(&self) -> Result<LandingRoute, SessionStoreError> {
        let route = LandingRoute::for_session(self.is_authenticated().await?);
        debug!(%route, "resolved landing route");
        Ok(route)
    }

    async fn is_admin(&self) -> Result<bool, SessionStoreError> {
        Ok(self
            .sessions
            .current()
            .await?
            .is_some_and(|session| session.is_admin()))
    }
}

/// Ends the caller's session.
pub struct LogoutService<S: ?Sized> {
    sessions: Arc<S>,
}

impl<S: SessionStore + ?Sized> LogoutService<S> {
    pub fn new(sessions: Arc<S>) -> Self {
        Self { sessions }
    }

    /// Clear the session and return the route to the login page.
    pub async fn logout(&self) -> Result<LandingRoute, SessionStoreError> {
        self.sessions.clear().await?;
        info!("session cleared");
        Ok(LandingRoute::Login)
    }
}
