//! Server configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `IDENTITY_GATE_*` environment variables or a
//! configuration file. Session cookie settings are derived from them with
//! [`session_settings`], which applies stricter rules in release builds.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroize;

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8080);
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;

/// Settings for the `identity-gate` server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "IDENTITY_GATE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// File holding the cookie signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`. Defaults to `true`.
    pub cookie_secure: Option<bool>,
    /// Permit a generated key when the key file is unreadable.
    pub allow_ephemeral_key: Option<bool>,
    /// JSON file of users to register in the directory at startup.
    pub directory_seed: Option<PathBuf>,
}

impl ServerSettings {
    /// Return the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Return the configured key path, falling back to the mounted secret.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH))
    }

    /// Whether session cookies carry the `Secure` attribute.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn allow_ephemeral_key(&self) -> bool {
        self.allow_ephemeral_key.unwrap_or(false)
    }

    pub fn directory_seed(&self) -> Option<&Path> {
        self.directory_seed.as_deref()
    }
}

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing key file.
    Debug,
    /// Release builds require a readable key unless ephemeral keys are
    /// explicitly allowed.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use identity_gate::config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Session cookie settings derived from [`ServerSettings`].
pub struct SessionSettings {
    /// Signing key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is shorter than the minimum key length.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Derive cookie session settings.
///
/// # Examples
///
/// ```rust
/// use identity_gate::config::{BuildMode, ServerSettings, session_settings};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("identity_gate_key_example");
/// std::fs::write(&key_path, vec![b'a'; 64])?;
///
/// let settings = ServerSettings {
///     bind_addr: None,
///     session_key_file: Some(key_path.clone()),
///     cookie_secure: None,
///     allow_ephemeral_key: None,
///     directory_seed: None,
/// };
/// let session = session_settings(&settings, BuildMode::Release)?;
/// assert!(session.cookie_secure);
///
/// std::fs::remove_file(&key_path)?;
/// # Ok(())
/// # }
/// ```
pub fn session_settings(
    settings: &ServerSettings,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = settings.cookie_secure();
    if !cookie_secure {
        warn!("session cookies are not marked Secure");
    }
    let same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let key = session_key(
        &settings.session_key_file(),
        mode,
        settings.allow_ephemeral_key(),
    )?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn session_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(SessionConfigError::KeyRead {
                    path: path.to_path_buf(),
                    source: error,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server configuration parsing.

    use super::*;
    use std::ffi::OsString;
    use std::io::Write;

    use env_lock::lock_env;
    use rstest::{fixture, rstest};

    const ENV_KEYS: [&str; 5] = [
        "IDENTITY_GATE_BIND_ADDR",
        "IDENTITY_GATE_SESSION_KEY_FILE",
        "IDENTITY_GATE_COOKIE_SECURE",
        "IDENTITY_GATE_ALLOW_EPHEMERAL_KEY",
        "IDENTITY_GATE_DIRECTORY_SEED",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("identity-gate")])
            .expect("config should load")
    }

    fn settings_with_key(path: Option<PathBuf>) -> ServerSettings {
        ServerSettings {
            bind_addr: None,
            session_key_file: path,
            cookie_secure: None,
            allow_ephemeral_key: None,
            directory_seed: None,
        }
    }

    fn key_file(len: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp key file");
        file.write_all(&vec![b'k'; len]).expect("write key");
        file
    }

    #[fixture]
    fn missing_key() -> PathBuf {
        std::env::temp_dir().join(format!("identity-gate-missing-{}", uuid::Uuid::new_v4()))
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(ENV_KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from(SESSION_KEY_DEFAULT_PATH)
        );
        assert!(settings.cookie_secure());
        assert!(!settings.allow_ephemeral_key());
        assert!(settings.directory_seed().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("IDENTITY_GATE_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            (
                "IDENTITY_GATE_SESSION_KEY_FILE",
                Some("/tmp/identity_gate_key".to_owned()),
            ),
            ("IDENTITY_GATE_COOKIE_SECURE", Some("false".to_owned())),
            ("IDENTITY_GATE_ALLOW_EPHEMERAL_KEY", Some("true".to_owned())),
            (
                "IDENTITY_GATE_DIRECTORY_SEED",
                Some("/tmp/directory.json".to_owned()),
            ),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            "127.0.0.1:9090".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from("/tmp/identity_gate_key")
        );
        assert!(!settings.cookie_secure());
        assert!(settings.allow_ephemeral_key());
        assert_eq!(
            settings.directory_seed(),
            Some(Path::new("/tmp/directory.json"))
        );
    }

    #[rstest]
    #[case(BuildMode::Debug, SameSite::Lax)]
    #[case(BuildMode::Release, SameSite::Strict)]
    fn readable_key_is_accepted(#[case] mode: BuildMode, #[case] same_site: SameSite) {
        let file = key_file(SESSION_KEY_MIN_LEN);
        let session = session_settings(&settings_with_key(Some(file.path().to_path_buf())), mode)
            .expect("valid key");
        assert_eq!(session.same_site, same_site);
        assert!(session.cookie_secure);
    }

    #[rstest]
    #[case(BuildMode::Debug)]
    #[case(BuildMode::Release)]
    fn short_key_is_rejected(#[case] mode: BuildMode) {
        let file = key_file(SESSION_KEY_MIN_LEN - 1);
        let result = session_settings(&settings_with_key(Some(file.path().to_path_buf())), mode);
        assert!(matches!(
            result,
            Err(SessionConfigError::KeyTooShort { length: 63, .. })
        ));
    }

    #[rstest]
    fn missing_key_falls_back_in_debug(missing_key: PathBuf) {
        let result = session_settings(&settings_with_key(Some(missing_key)), BuildMode::Debug);
        assert!(result.is_ok());
    }

    #[rstest]
    fn missing_key_fails_in_release(missing_key: PathBuf) {
        let result = session_settings(&settings_with_key(Some(missing_key)), BuildMode::Release);
        assert!(matches!(result, Err(SessionConfigError::KeyRead { .. })));
    }

    #[rstest]
    fn ephemeral_opt_in_allows_missing_key_in_release(missing_key: PathBuf) {
        let mut settings = settings_with_key(Some(missing_key));
        settings.allow_ephemeral_key = Some(true);
        assert!(session_settings(&settings, BuildMode::Release).is_ok());
    }
}
