//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **directory**: in-memory user directory, optionally seeded from JSON
//! - **enrichment**: profile canonicalisation applied before session use
//! - **sessions**: server-side session registry scoped per caller context
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no login policy.

pub mod directory;
pub mod enrichment;
pub mod sessions;
