//! Domain primitives, services, and ports for identity-code login.
//!
//! Purpose: validate caller input, decide where a caller goes next, and talk
//! to collaborators only through the traits in [`ports`]. Types here are
//! immutable once built and document their invariants in Rustdoc.
//!
//! Public surface:
//! - IdentityCode: validated ten-digit national identifier.
//! - User: directory record read by the login flow.
//! - LoginRequest / LoginOutcome: use-case input and tagged result.
//! - LoginOrchestrator: the login use case.
//! - SessionGateService / LogoutService: page-load routing and sign-out.
//! - Error: transport-facing error payload.

pub mod auth;
pub mod error;
pub mod identity_code;
pub mod login_orchestrator;
pub mod mobile_number;
pub mod ports;
pub mod session_gate;
pub mod user;

pub use self::auth::{
    ADMIN_ROLE, AuthenticatedSession, LandingRoute, LoginOutcome, LoginOutcomeKind, LoginRequest,
    SelectedRole, USER_NOT_FOUND_MESSAGE,
};
pub use self::error::{Error, ErrorCode};
pub use self::identity_code::{IDENTITY_CODE_LEN, IdentityCode, IdentityCodeError, check_digit};
pub use self::login_orchestrator::LoginOrchestrator;
pub use self::mobile_number::{MobileNumber, MobileNumberError};
pub use self::session_gate::{LogoutService, SessionGateService};
pub use self::user::{User, UserDraft, UserId, UserValidationError};
