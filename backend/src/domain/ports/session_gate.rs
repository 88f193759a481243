//! Driving port for read-only session queries made on page load.

use async_trait::async_trait;

use crate::domain::LandingRoute;

use super::SessionStoreError;

/// Domain use-case port answering "who is the current caller".
///
/// Implementations never mutate the session.
#[async_trait]
pub trait SessionGate: Send + Sync {
    /// Whether the caller holds a previously persisted session.
    async fn is_authenticated(&self) -> Result<bool, SessionStoreError>;

    /// `/user` for authenticated callers, `/auth/login` otherwise.
    async fn landing_route(&self) -> Result<LandingRoute, SessionStoreError>;

    /// Whether the caller is authenticated under the administrator role.
    async fn is_admin(&self) -> Result<bool, SessionStoreError>;
}
