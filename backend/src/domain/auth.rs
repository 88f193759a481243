//! Authentication primitives for identity-code logins.
//!
//! Inbound adapters hand raw caller input to [`LoginRequest`]; the login
//! orchestrator answers with a [`LoginOutcome`] whose constructors enforce the
//! success / registration / rejection invariant.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{IdentityCodeError, User, UserId};

/// Role value that routes to the administration dashboard.
pub const ADMIN_ROLE: &str = "Admin";

/// Message returned when a valid identity code has no directory entry.
pub const USER_NOT_FOUND_MESSAGE: &str = "User was not found for this national code.";

/// Role chosen by the caller at the login prompt.
///
/// The value is not checked against a fixed set of roles; only
/// [`ADMIN_ROLE`] receives special routing. It is compared verbatim, so
/// `"admin"` or `" Admin"` are ordinary roles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedRole(String);

impl SelectedRole {
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// Whether this is exactly the administrator role.
    pub fn is_admin(&self) -> bool {
        self.0 == ADMIN_ROLE
    }
}

impl AsRef<str> for SelectedRole {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SelectedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Page a caller should be sent to next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LandingRoute {
    #[serde(rename = "/auth/login")]
    Login,
    #[serde(rename = "/auth/register")]
    Register,
    #[serde(rename = "/admin/dashboard")]
    AdminDashboard,
    #[serde(rename = "/user")]
    UserHome,
}

impl LandingRoute {
    /// Route taken after a successful login with `role`.
    pub fn after_login(role: &SelectedRole) -> Self {
        if role.is_admin() {
            Self::AdminDashboard
        } else {
            Self::UserHome
        }
    }

    /// Route for an initial page load given the session state.
    pub fn for_session(authenticated: bool) -> Self {
        if authenticated {
            Self::UserHome
        } else {
            Self::Login
        }
    }

    /// Path of this route; never empty.
    pub fn as_path(self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::Register => "/auth/register",
            Self::AdminDashboard => "/admin/dashboard",
            Self::UserHome => "/user",
        }
    }
}

impl fmt::Display for LandingRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// Untrusted login submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    raw_identifier: String,
    role: SelectedRole,
}

impl LoginRequest {
    /// Capture the caller's raw input; nothing is validated here.
    pub fn new(raw_identifier: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            raw_identifier: raw_identifier.into(),
            role: SelectedRole::new(role),
        }
    }

    pub fn raw_identifier(&self) -> &str {
        self.raw_identifier.as_str()
    }

    pub fn role(&self) -> &SelectedRole {
        &self.role
    }
}

/// Which terminal branch a login attempt took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoginOutcomeKind {
    /// Session established.
    Authenticated,
    /// Identifier valid but unknown; caller should register.
    RegistrationRequired,
    /// Identifier malformed or failed its checksum.
    InvalidIdentifier,
}

/// Result of a completed login attempt.
///
/// ## Invariants
/// Exactly one of the following holds:
/// - `success` with `user_id` set and no error message;
/// - `requires_registration` with no `user_id`;
/// - rejection with an error message, no `user_id`, no registration flag.
///
/// `redirect_uri` is always a non-empty path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    success: bool,
    error_message: Option<String>,
    #[schema(value_type = Option<String>, example = "1024")]
    user_id: Option<UserId>,
    #[schema(value_type = String, example = "/user")]
    redirect_uri: LandingRoute,
    requires_registration: bool,
    kind: LoginOutcomeKind,
}

impl LoginOutcome {
    /// Session persisted for `user_id`; redirect depends on the role.
    pub fn authenticated(user_id: UserId, role: &SelectedRole) -> Self {
        Self {
            success: true,
            error_message: None,
            user_id: Some(user_id),
            redirect_uri: LandingRoute::after_login(role),
            requires_registration: false,
            kind: LoginOutcomeKind::Authenticated,
        }
    }

    /// Valid identifier with no directory entry.
    pub fn registration_required() -> Self {
        Self {
            success: false,
            error_message: Some(USER_NOT_FOUND_MESSAGE.to_owned()),
            user_id: None,
            redirect_uri: LandingRoute::Register,
            requires_registration: true,
            kind: LoginOutcomeKind::RegistrationRequired,
        }
    }

    /// Identifier rejected before any lookup.
    pub fn invalid_identifier(error: &IdentityCodeError) -> Self {
        Self {
            success: false,
            error_message: Some(error.to_string()),
            user_id: None,
            redirect_uri: LandingRoute::Login,
            requires_registration: false,
            kind: LoginOutcomeKind::InvalidIdentifier,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn redirect(&self) -> LandingRoute {
        self.redirect_uri
    }

    pub fn redirect_uri(&self) -> &'static str {
        self.redirect_uri.as_path()
    }

    pub fn requires_registration(&self) -> bool {
        self.requires_registration
    }

    pub fn kind(&self) -> LoginOutcomeKind {
        self.kind
    }
}

/// Session record held by a session store for one caller context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub user: User,
    pub role: SelectedRole,
    pub established_at: DateTime<Utc>,
}

impl AuthenticatedSession {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
