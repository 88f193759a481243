//! Identity gate entry-point: loads configuration, seeds the directory and
//! serves the login endpoints.

mod server;

use std::sync::Arc;

use ortho_config::OrthoConfig;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use identity_gate::config::{BuildMode, ServerSettings, session_settings};
use identity_gate::outbound::directory::InMemoryUserDirectory;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|error| std::io::Error::other(error.to_string()))?;
    let session = session_settings(&settings, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr(),
    );
    if let Some(path) = settings.directory_seed() {
        let directory =
            InMemoryUserDirectory::from_seed_file(path).map_err(std::io::Error::other)?;
        config = config.with_directory(Arc::new(directory));
    } else {
        warn!("no directory seed configured; every identity code will require registration");
    }

    let shutdown = CancellationToken::new();
    let server = create_server(config, shutdown.clone())?;
    let result = server.await;
    shutdown.cancel();
    result
}
