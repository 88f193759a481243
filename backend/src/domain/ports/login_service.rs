//! Driving port for identity-code login use-cases.
//!
//! Inbound adapters call this port with untrusted input and receive either a
//! [`LoginOutcome`] (every designed branch, including bad input and unknown
//! users) or a [`LoginError`] (collaborator failure or cancellation).

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{LoginOutcome, LoginRequest};

use super::{SessionStoreError, UserDirectoryError, UserEnrichmentError};

/// Step of the login sequence that talks to a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStep {
    /// Querying the user directory.
    Lookup,
    /// Enriching the located user.
    Enrichment,
    /// Recording the session.
    SessionPersist,
}

/// Coarse classification of a [`LoginError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginErrorKind {
    /// A collaborator failed.
    SystemFailure,
    /// The caller stopped the attempt.
    Cancelled,
}

/// Non-outcome terminations of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// The user directory failed; distinct from "user not found".
    #[error("user lookup failed: {0}")]
    Lookup(#[source] UserDirectoryError),
    /// Enrichment of the located user failed.
    #[error("user enrichment failed: {0}")]
    Enrichment(#[source] UserEnrichmentError),
    /// The session could not be recorded; the login did not happen.
    #[error("session could not be persisted: {0}")]
    SessionPersist(#[source] SessionStoreError),
    /// The caller cancelled the attempt while `step` was in flight.
    #[error("login cancelled during {step:?}")]
    Cancelled { step: LoginStep },
}

impl LoginError {
    pub fn kind(&self) -> LoginErrorKind {
        match self {
            Self::Cancelled { .. } => LoginErrorKind::Cancelled,
            Self::Lookup(_) | Self::Enrichment(_) | Self::SessionPersist(_) => {
                LoginErrorKind::SystemFailure
            }
        }
    }

    /// Whether the attempt ended by cancellation rather than failure.
    pub fn is_cancelled(&self) -> bool {
        self.kind() == LoginErrorKind::Cancelled
    }

    /// Step that was running when the attempt ended.
    pub fn step(&self) -> LoginStep {
        match self {
            Self::Lookup(_) => LoginStep::Lookup,
            Self::Enrichment(_) => LoginStep::Enrichment,
            Self::SessionPersist(_) => LoginStep::SessionPersist,
            Self::Cancelled { step } => *step,
        }
    }
}

/// Domain use-case port for identity-code login.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Run one login attempt, honouring `cancel` between and during steps.
    async fn login(
        &self,
        request: LoginRequest,
        cancel: &CancellationToken,
    ) -> Result<LoginOutcome, LoginError>;
}
