//! Identity-code login orchestration.
//!
//! One attempt walks a fixed sequence:
//!
//! ```text
//! parse ──invalid──────────────────────────────▶ InvalidIdentifier (/auth/login)
//!   │
//!   ▼
//! lookup ──absent──────────────────────────────▶ RegistrationRequired (/auth/register)
//!   │
//!   ▼
//! enrich ─▶ persist session ─▶ route ──────────▶ Authenticated (/admin/dashboard | /user)
//! ```
//!
//! Collaborator failures and cancellation leave the sequence as
//! [`LoginError`]; there is no path from a failure to a success or
//! registration outcome. Collaborator calls are awaited strictly in order and
//! the service keeps no state between attempts.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    LoginError, LoginService, LoginStep, SessionStore, UserDirectory, UserEnricher,
};
use crate::domain::{IdentityCode, LoginOutcome, LoginRequest};

/// Login use-case service wired to its three collaborators.
pub struct LoginOrchestrator<D: ?Sized, E: ?Sized, S: ?Sized> {
    directory: Arc<D>,
    enricher: Arc<E>,
    sessions: Arc<S>,
}

impl<D: ?Sized, E: ?Sized, S: ?Sized> LoginOrchestrator<D, E, S> {
    /// Create a new orchestrator. `sessions` must be bound to the caller
    /// whose login is being processed.
    pub fn new(directory: Arc<D>, enricher: Arc<E>, sessions: Arc<S>) -> Self {
        Self {
            directory,
            enricher,
            sessions,
        }
    }
}

impl<D: ?Sized, E: ?Sized, S: ?Sized> Clone for LoginOrchestrator<D, E, S> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            enricher: Arc::clone(&self.enricher),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

/// Await `step` unless `cancel` fires first. An already-cancelled token wins
/// without polling the step.
async fn unless_cancelled<F>(
    cancel: &CancellationToken,
    step: LoginStep,
    future: F,
) -> Result<F::Output, LoginError>
where
    F: Future + Send,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            debug!(?step, "login attempt cancelled");
            Err(LoginError::Cancelled { step })
        }
        output = future => Ok(output),
    }
}

#[async_trait]
impl<D, E, S> LoginService for LoginOrchestrator<D, E, S>
where
    D: UserDirectory + ?Sized,
    E: UserEnricher + ?Sized,
    S: SessionStore + ?Sized,
{
    async fn login(
        &self,
        request: LoginRequest,
        cancel: &CancellationToken,
    ) -> Result<LoginOutcome, LoginError> {
        let code = match IdentityCode::parse(request.raw_identifier()) {
            Ok(code) => code,
            Err(error) => {
                warn!(%error, "identity code rejected");
                return Ok(LoginOutcome::invalid_identifier(&error));
            }
        };
        let identity = code.masked();
        debug!(%identity, "looking up user");

        let found = unless_cancelled(
            cancel,
            LoginStep::Lookup,
            self.directory.find_by_identity(&code),
        )
        .await?
        .map_err(|source| {
            error!(%identity, error = %source, "user directory lookup failed");
            LoginError::Lookup(source)
        })?;

        let Some(user) = found else {
            info!(%identity, "no user for identity code; registration required");
            return Ok(LoginOutcome::registration_required());
        };

        debug!(%identity, user_id = %user.id(), "enriching user");
        let enriched = unless_cancelled(cancel, LoginStep::Enrichment, self.enricher.enrich(&user))
            .await?
            .map_err(|source| {
                error!(user_id = %user.id(), error = %source, "user enrichment failed");
                LoginError::Enrichment(source)
            })?;

        let role = request.role();
        debug!(user_id = %enriched.id(), %role, "persisting session");
        unless_cancelled(
            cancel,
            LoginStep::SessionPersist,
            self.sessions.persist(&enriched, role),
        )
        .await?
        .map_err(|source| {
            error!(user_id = %enriched.id(), error = %source, "session persistence failed");
            LoginError::SessionPersist(source)
        })?;

        let outcome = LoginOutcome::authenticated(enriched.id().clone(), role);
        info!(
            user_id = %enriched.id(),
            %role,
            redirect = outcome.redirect_uri(),
            "login succeeded"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "login_orchestrator_tests.rs"]
mod tests;
