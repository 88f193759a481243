//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use mockable::DefaultClock;

use crate::domain::ports::UserDirectory;
use crate::domain::{IdentityCode, User, UserDraft};
use crate::inbound::http::state::HttpState;
use crate::outbound::directory::InMemoryUserDirectory;
use crate::outbound::enrichment::ProfileEnricher;
use crate::outbound::sessions::SessionRegistry;

/// Identity code registered by [`seeded_directory`].
pub const KNOWN_CODE: &str = "0499370899";
/// Valid identity code with no directory entry.
pub const UNKNOWN_CODE: &str = "0012345679";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Directory holding a single customer under [`KNOWN_CODE`].
pub fn seeded_directory() -> InMemoryUserDirectory {
    let directory = InMemoryUserDirectory::new();
    let code = IdentityCode::parse(KNOWN_CODE).expect("fixture code");
    let user = User::try_new(UserDraft {
        id: "1024".to_owned(),
        first_name: " Ada ".to_owned(),
        last_name: "Lovelace".to_owned(),
        phone_number: Some("+989121234567".to_owned()),
        role: "Customer".to_owned(),
    })
    .expect("fixture user");
    directory.insert(code, user).expect("seed directory");
    directory
}

/// HTTP state over `directory` with the profile enricher and a fresh
/// registry.
pub fn test_state(directory: Arc<dyn UserDirectory>) -> HttpState {
    HttpState::new(
        directory,
        Arc::new(ProfileEnricher),
        Arc::new(SessionRegistry::new(Arc::new(DefaultClock))),
    )
}
