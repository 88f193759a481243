//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The signed cookie only carries an opaque [`SessionKey`]. Authenticated
//! state lives in the server-side [`SessionRegistry`]; this wrapper resolves
//! the cookie to a [`ScopedSessionStore`] the domain services can use.

use std::sync::Arc;

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::Error;
use crate::outbound::sessions::{ScopedSessionStore, SessionKey, SessionRegistry};

pub(crate) const SESSION_KEY: &str = "session_key";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Session key carried by the cookie, if present and well formed.
    pub fn session_key(&self) -> Result<Option<SessionKey>, Error> {
        let raw = self
            .0
            .get::<String>(SESSION_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match raw {
            Some(raw) => match raw.parse::<SessionKey>() {
                Ok(key) => Ok(Some(key)),
                Err(error) => {
                    warn!("invalid session key in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Start a new cookie session carrying `key`.
    ///
    /// The previous session state is discarded and the cookie is renewed, so
    /// a key planted before login never names the authenticated session.
    pub fn begin(&self, key: SessionKey) -> Result<(), Error> {
        self.0.renew();
        self.0.clear();
        self.0
            .insert(SESSION_KEY, key.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Session store for the key in the cookie, if any. Never writes the
    /// cookie.
    pub fn existing_store(
        &self,
        registry: &Arc<SessionRegistry>,
    ) -> Result<Option<ScopedSessionStore>, Error> {
        Ok(self.session_key()?.map(|key| registry.scoped(key)))
    }

    /// Drop the cookie entirely.
    pub fn forget(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
