//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the login and session endpoints together with the
//! payload schemas they exchange. The document backs Swagger UI in debug
//! builds and is exported via `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, LandingRoute, LoginOutcome, LoginOutcomeKind};
use crate::inbound::http::auth::{
    LandingResponse, LoginRequestBody, LogoutResponse, SessionStatus,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Identity gate API",
        description = "Identity-code login and session bootstrap for the CRM front end."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::landing,
        crate::inbound::http::auth::session_status,
        crate::inbound::http::auth::logout,
    ),
    components(schemas(
        LoginRequestBody,
        LoginOutcome,
        LoginOutcomeKind,
        LandingRoute,
        LandingResponse,
        SessionStatus,
        LogoutResponse,
        Error,
        ErrorCode
    )),
    tags(
        (name = "auth", description = "Identity-code login and session state")
    )
)]
pub struct ApiDoc;
