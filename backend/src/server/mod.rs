//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;
use std::time::Duration;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[cfg(debug_assertions)]
use identity_gate::doc::ApiDoc;
use identity_gate::inbound::http::auth::{landing, login, logout, session_status};
use identity_gate::inbound::http::json_config;
use identity_gate::inbound::http::state::HttpState;
use identity_gate::outbound::directory::InMemoryUserDirectory;
use identity_gate::outbound::enrichment::ProfileEnricher;
use identity_gate::outbound::sessions::{SESSION_TTL_HOURS, SessionEvent, SessionRegistry};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::hours(SESSION_TTL_HOURS)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .app_data(json_config())
        .service(login)
        .service(landing)
        .service(session_status)
        .service(logout);

    let app = App::new().app_data(http_state).service(api);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Log session changes until the registry is dropped or shutdown begins.
fn spawn_session_audit(registry: &SessionRegistry, shutdown: CancellationToken) {
    let mut events = registry.subscribe();
    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                event = events.recv() => event,
            };
            match event {
                Ok(SessionEvent::SignedIn { key, user_id }) => {
                    info!(session = %key, user_id = %user_id, "session started");
                }
                Ok(SessionEvent::SignedOut { key }) => {
                    info!(session = %key, "session ended");
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    info!(skipped, "session audit lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Periodically drop sessions whose cookies have expired.
fn spawn_session_sweeper(registry: Arc<SessionRegistry>, shutdown: CancellationToken) {
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                _ = ticks.tick() => {}
            }
            match registry.evict_expired() {
                Ok(0) => {}
                Ok(evicted) => debug!(evicted, "evicted expired sessions"),
                Err(error) => warn!(%error, "session sweep failed"),
            }
        }
    });
}

/// Construct an Actix HTTP server from `config`.
///
/// `shutdown` is cancelled by the caller once the server stops; in-flight
/// login attempts observe it and end with a cancellation error.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig, shutdown: CancellationToken) -> std::io::Result<Server> {
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        directory,
    } = config;

    let directory = directory.unwrap_or_else(|| Arc::new(InMemoryUserDirectory::new()));
    let sessions = Arc::new(SessionRegistry::new(Arc::new(DefaultClock)));
    spawn_session_audit(&sessions, shutdown.clone());
    spawn_session_sweeper(Arc::clone(&sessions), shutdown.clone());

    let http_state = web::Data::new(
        HttpState::new(directory, Arc::new(ProfileEnricher), sessions).with_shutdown(shutdown),
    );

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "identity gate listening");
    Ok(server)
}
