//! Behaviour tests for the identity-code login journeys.
//!
//! Scenarios drive the login orchestrator, session gate and logout service
//! against the in-memory adapters the server wires at startup.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use identity_gate::domain::ports::{
    LoginService, SessionGate, UserDirectory, UserDirectoryError,
};
use identity_gate::domain::{
    IdentityCode, LandingRoute, LoginOrchestrator, LoginOutcome, LoginOutcomeKind, LoginRequest,
    LogoutService, SessionGateService, User, UserDraft,
};
use identity_gate::outbound::directory::InMemoryUserDirectory;
use identity_gate::outbound::enrichment::ProfileEnricher;
use identity_gate::outbound::sessions::{
    ScopedSessionStore, SessionEvent, SessionKey, SessionRegistry,
};
use mockable::DefaultClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

const REGISTERED_CODE: &str = "0499370899";
const UNREGISTERED_CODE: &str = "0012345679";

/// Directory that counts lookups before delegating.
struct CountingDirectory {
    inner: InMemoryUserDirectory,
    lookups: AtomicUsize,
}

#[async_trait]
impl UserDirectory for CountingDirectory {
    async fn find_by_identity(
        &self,
        code: &IdentityCode,
    ) -> Result<Option<User>, UserDirectoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_identity(code).await
    }
}

struct LoginWorld {
    runtime: Runtime,
    directory: Arc<CountingDirectory>,
    registry: Arc<SessionRegistry>,
    store: Arc<ScopedSessionStore>,
    events: RefCell<broadcast::Receiver<SessionEvent>>,
    outcome: RefCell<Option<LoginOutcome>>,
}

impl LoginWorld {
    fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        let registry = Arc::new(SessionRegistry::new(Arc::new(DefaultClock)));
        let store = Arc::new(registry.scoped(SessionKey::generate()));
        let events = RefCell::new(registry.subscribe());
        Self {
            runtime,
            directory: Arc::new(CountingDirectory {
                inner: InMemoryUserDirectory::new(),
                lookups: AtomicUsize::new(0),
            }),
            registry,
            store,
            events,
            outcome: RefCell::new(None),
        }
    }

    fn login(&self, raw: &str, role: &str) {
        let service = LoginOrchestrator::new(
            Arc::clone(&self.directory),
            Arc::new(ProfileEnricher),
            Arc::clone(&self.store),
        );
        let outcome = self
            .runtime
            .block_on(service.login(LoginRequest::new(raw, role), &CancellationToken::new()))
            .expect("login completes with an outcome");
        *self.outcome.borrow_mut() = Some(outcome);
    }

    fn with_outcome<F>(&self, f: F)
    where
        F: FnOnce(&LoginOutcome),
    {
        let outcome = self.outcome.borrow();
        f(outcome.as_ref().expect("login outcome"));
    }

    fn gate(&self) -> SessionGateService<ScopedSessionStore> {
        SessionGateService::new(Arc::clone(&self.store))
    }
}

#[fixture]
fn world() -> LoginWorld {
    LoginWorld::new()
}

#[given("a directory with one registered customer")]
fn a_directory_with_one_registered_customer(world: &LoginWorld) {
    let user = User::try_new(UserDraft {
        id: "1024".to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        phone_number: Some("+989121234567".to_owned()),
        role: "Customer".to_owned(),
    })
    .expect("fixture user");
    world
        .directory
        .inner
        .insert(IdentityCode::parse(REGISTERED_CODE).expect("code"), user)
        .expect("seed directory");
}

#[given("an agent is signed in")]
fn an_agent_is_signed_in(world: &LoginWorld) {
    world.login(REGISTERED_CODE, "Agent");
    world.with_outcome(|outcome| assert!(outcome.success()));
}

#[when("an administrator logs in with the registered code")]
fn an_administrator_logs_in_with_the_registered_code(world: &LoginWorld) {
    world.login(REGISTERED_CODE, "Admin");
}

#[when("an agent logs in with the registered code surrounded by spaces")]
fn an_agent_logs_in_with_padded_code(world: &LoginWorld) {
    world.login(&format!("  {REGISTERED_CODE} "), "Agent");
}

#[when("an agent logs in with an unregistered code")]
fn an_agent_logs_in_with_an_unregistered_code(world: &LoginWorld) {
    world.login(UNREGISTERED_CODE, "Agent");
}

#[when("an agent logs in with repeated digits")]
fn an_agent_logs_in_with_repeated_digits(world: &LoginWorld) {
    world.login("1111111111", "Agent");
}

#[when("an agent logs in with an empty code")]
fn an_agent_logs_in_with_an_empty_code(world: &LoginWorld) {
    world.login("", "Agent");
}

#[when("the caller logs out")]
fn the_caller_logs_out(world: &LoginWorld) {
    let route = world
        .runtime
        .block_on(LogoutService::new(Arc::clone(&world.store)).logout())
        .expect("logout");
    assert_eq!(route, LandingRoute::Login);
}

#[then("the login succeeds")]
fn the_login_succeeds(world: &LoginWorld) {
    world.with_outcome(|outcome| {
        assert!(outcome.success());
        assert_eq!(outcome.kind(), LoginOutcomeKind::Authenticated);
        assert_eq!(outcome.user_id().map(AsRef::as_ref), Some("1024"));
        assert!(outcome.error_message().is_none());
    });
}

#[then("registration is required")]
fn registration_is_required(world: &LoginWorld) {
    world.with_outcome(|outcome| {
        assert!(!outcome.success());
        assert!(outcome.requires_registration());
        assert_eq!(
            outcome.error_message(),
            Some("User was not found for this national code.")
        );
    });
    assert!(world.registry.is_empty());
}

#[then("the identifier is rejected")]
fn the_identifier_is_rejected(world: &LoginWorld) {
    world.with_outcome(|outcome| {
        assert_eq!(outcome.kind(), LoginOutcomeKind::InvalidIdentifier);
        assert!(
            outcome
                .error_message()
                .is_some_and(|message| message.starts_with("Invalid"))
        );
    });
}

#[then("the identifier is rejected as missing")]
fn the_identifier_is_rejected_as_missing(world: &LoginWorld) {
    world.with_outcome(|outcome| {
        assert_eq!(outcome.kind(), LoginOutcomeKind::InvalidIdentifier);
        assert_eq!(outcome.error_message(), Some("National code is required."));
    });
}

#[then("the login redirects to {path}")]
fn the_login_redirects_to(world: &LoginWorld, path: String) {
    world.with_outcome(|outcome| assert_eq!(outcome.redirect_uri(), path));
}

#[then("the landing route is {path}")]
fn the_landing_route_is(world: &LoginWorld, path: String) {
    let route = world
        .runtime
        .block_on(world.gate().landing_route())
        .expect("landing route");
    assert_eq!(route.as_path(), path);
}

#[then("the caller is an administrator")]
fn the_caller_is_an_administrator(world: &LoginWorld) {
    let is_admin = world
        .runtime
        .block_on(world.gate().is_admin())
        .expect("admin check");
    assert!(is_admin);
}

#[then("the caller is not an administrator")]
fn the_caller_is_not_an_administrator(world: &LoginWorld) {
    let is_admin = world
        .runtime
        .block_on(world.gate().is_admin())
        .expect("admin check");
    assert!(!is_admin);
}

#[then("the directory was not searched")]
fn the_directory_was_not_searched(world: &LoginWorld) {
    assert_eq!(world.directory.lookups.load(Ordering::SeqCst), 0);
}

#[then("a sign-out event was published")]
fn a_sign_out_event_was_published(world: &LoginWorld) {
    let mut events = world.events.borrow_mut();
    let mut saw_sign_out = false;
    while let Ok(event) = events.try_recv() {
        if matches!(event, SessionEvent::SignedOut { .. }) {
            saw_sign_out = true;
        }
    }
    assert!(saw_sign_out);
}

#[scenario(path = "tests/features/login_flow.feature")]
fn login_flow_scenarios(world: LoginWorld) {
    drop(world);
}
