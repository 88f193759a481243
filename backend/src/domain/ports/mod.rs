//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`UserDirectory`], [`UserEnricher`], [`SessionStore`]) are
//! implemented by outbound adapters. Driving ports ([`LoginService`],
//! [`SessionGate`]) are implemented by domain services and called by inbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod session_gate;
mod session_store;
mod user_directory;
mod user_enricher;

pub use login_service::{LoginError, LoginErrorKind, LoginService, LoginStep};
pub use session_gate::SessionGate;
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{SessionStore, SessionStoreError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserDirectory, UserDirectoryError};
#[cfg(test)]
pub use user_enricher::MockUserEnricher;
pub use user_enricher::{PassThroughEnricher, UserEnricher, UserEnrichmentError};
