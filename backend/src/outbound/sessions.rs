//! Server-side session registry.
//!
//! Each caller context is identified by an opaque [`SessionKey`]. The HTTP
//! layer keeps only that key in its signed cookie; the authenticated user and
//! selected role stay on the server. [`ScopedSessionStore`] binds the registry
//! to one key so domain services see a single-caller [`SessionStore`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{AuthenticatedSession, SelectedRole, User, UserId};

const EVENT_CAPACITY: usize = 64;

/// Lifetime of a session, matching the cookie's persistent TTL.
pub const SESSION_TTL_HOURS: i64 = 8;

/// Opaque identifier for one caller context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(Uuid);

impl SessionKey {
    /// Mint a fresh random key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionKey {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Change notification published when a session starts or ends.
///
/// Views holding a stale authentication snapshot subscribe to these events
/// and re-query the gate instead of caching login state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { key: SessionKey, user_id: UserId },
    SignedOut { key: SessionKey },
}

/// Shared map of live sessions keyed by caller context.
///
/// Records older than the TTL are treated as absent. They are dropped when
/// read, on every insert, and by [`SessionRegistry::evict_expired`].
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionKey, AuthenticatedSession>>,
    events: broadcast::Sender<SessionEvent>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            sessions: RwLock::new(HashMap::new()),
            events,
            clock,
            ttl: Duration::hours(SESSION_TTL_HOURS),
        }
    }

    /// Replace the session lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Receive future session changes. Events sent before subscribing are not
    /// replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Number of stored sessions, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .map(|sessions| sessions.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store bound to the caller identified by `key`.
    pub fn scoped(self: &Arc<Self>, key: SessionKey) -> ScopedSessionStore {
        ScopedSessionStore {
            registry: Arc::clone(self),
            key,
        }
    }

    fn insert(
        &self,
        key: SessionKey,
        user: &User,
        role: &SelectedRole,
    ) -> Result<(), SessionStoreError> {
        let now = self.clock.utc();
        let session = AuthenticatedSession {
            user: user.clone(),
            role: role.clone(),
            established_at: now,
        };
        let evicted = {
            let mut sessions = self
                .sessions
                .write()
                .map_err(|_| SessionStoreError::write("session registry lock poisoned"))?;
            let evicted = self.sweep(&mut sessions, now);
            sessions.insert(key, session);
            evicted
        };
        self.announce_evictions(evicted);
        self.publish(SessionEvent::SignedIn {
            key,
            user_id: user.id().clone(),
        });
        Ok(())
    }

    fn get(&self, key: SessionKey) -> Result<Option<AuthenticatedSession>, SessionStoreError> {
        let now = self.clock.utc();
        let found = self
            .sessions
            .read()
            .map_err(|_| SessionStoreError::read("session registry lock poisoned"))?
            .get(&key)
            .cloned();
        match found {
            Some(session) if self.is_expired(&session, now) => {
                debug!(session = %key, "session expired");
                self.remove(key)?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Drop every session older than the TTL, returning how many went.
    pub fn evict_expired(&self) -> Result<usize, SessionStoreError> {
        let now = self.clock.utc();
        let evicted = {
            let mut sessions = self
                .sessions
                .write()
                .map_err(|_| SessionStoreError::write("session registry lock poisoned"))?;
            self.sweep(&mut sessions, now)
        };
        let count = evicted.len();
        self.announce_evictions(evicted);
        Ok(count)
    }

    fn is_expired(&self, session: &AuthenticatedSession, now: DateTime<Utc>) -> bool {
        now - session.established_at >= self.ttl
    }

    fn sweep(
        &self,
        sessions: &mut HashMap<SessionKey, AuthenticatedSession>,
        now: DateTime<Utc>,
    ) -> Vec<SessionKey> {
        let expired: Vec<SessionKey> = sessions
            .iter()
            .filter(|(_, session)| self.is_expired(session, now))
            .map(|(key, _)| *key)
            .collect();
        for key in &expired {
            sessions.remove(key);
        }
        expired
    }

    fn announce_evictions(&self, evicted: Vec<SessionKey>) {
        for key in evicted {
            self.publish(SessionEvent::SignedOut { key });
        }
    }

    fn remove(&self, key: SessionKey) -> Result<(), SessionStoreError> {
        let removed = self
            .sessions
            .write()
            .map_err(|_| SessionStoreError::write("session registry lock poisoned"))?
            .remove(&key);
        if removed.is_some() {
            self.publish(SessionEvent::SignedOut { key });
        }
        Ok(())
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is the common case.
        if self.events.send(event).is_err() {
            debug!("no session event subscribers");
        }
    }
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.len())
            .finish_non_exhaustive()
    }
}

/// [`SessionStore`] view of the registry for a single caller.
#[derive(Debug, Clone)]
pub struct ScopedSessionStore {
    registry: Arc<SessionRegistry>,
    key: SessionKey,
}

impl ScopedSessionStore {
    pub fn key(&self) -> SessionKey {
        self.key
    }
}

#[async_trait]
impl SessionStore for ScopedSessionStore {
    async fn persist(&self, user: &User, role: &SelectedRole) -> Result<(), SessionStoreError> {
        self.registry.insert(self.key, user, role)
    }

    async fn current(&self) -> Result<Option<AuthenticatedSession>, SessionStoreError> {
        self.registry.get(self.key)
    }

    async fn clear(&self) -> Result<(), SessionStoreError> {
        self.registry.remove(self.key)
    }
}
