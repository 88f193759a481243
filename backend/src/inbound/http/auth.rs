//! Login, landing and logout handlers.
//!
//! ```text
//! POST /api/v1/login {"nationalCode":"0499370899","role":"Admin"}
//! GET  /api/v1/landing
//! GET  /api/v1/session
//! POST /api/v1/logout
//! ```
//!
//! Every login branch the domain designs (authenticated, registration
//! required, invalid identifier) answers `200` with the outcome body so the
//! page can route on `redirectUri`. Only collaborator failures become error
//! responses.

use std::sync::Arc;

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::ports::{LoginService, SessionGate, SessionStore};
use crate::domain::{
    Error, LandingRoute, LoginOrchestrator, LoginOutcome, LoginRequest, LogoutService,
    SessionGateService,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::outbound::sessions::SessionKey;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    #[schema(example = "0499370899")]
    pub national_code: String,
    #[schema(example = "Admin")]
    pub role: String,
}

impl From<LoginRequestBody> for LoginRequest {
    fn from(value: LoginRequestBody) -> Self {
        LoginRequest::new(value.national_code, value.role)
    }
}

/// Where an initial page load should go.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LandingResponse {
    #[schema(value_type = String, example = "/user")]
    pub redirect_uri: LandingRoute,
    pub authenticated: bool,
}

/// Snapshot of the caller's session.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub authenticated: bool,
    pub is_admin: bool,
}

/// Redirect issued after sign-out.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    #[schema(value_type = String, example = "/auth/login")]
    pub redirect_uri: LandingRoute,
}

/// Verify an identity code and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequestBody,
    responses(
        (status = 200, description = "Login outcome", body = LoginOutcome,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Malformed request body", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Collaborator unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<web::Json<LoginOutcome>> {
    // Every attempt records under a fresh key; the caller's existing key is
    // only replaced once the login succeeds.
    let previous = session.session_key()?;
    let key = SessionKey::generate();
    let service = LoginOrchestrator::new(
        Arc::clone(&state.directory),
        Arc::clone(&state.enricher),
        Arc::new(state.sessions.scoped(key)),
    );
    let cancel = state.shutdown.child_token();
    let outcome = service
        .login(payload.into_inner().into(), &cancel)
        .await
        .map_err(|err| {
            if err.is_cancelled() {
                warn!(step = ?err.step(), "login interrupted");
            } else {
                error!(error = %err, step = ?err.step(), "login failed");
            }
            Error::from(err)
        })?;
    if outcome.success() {
        if let Some(previous) = previous {
            state.sessions.scoped(previous).clear().await?;
        }
        session.begin(key)?;
    }
    Ok(web::Json(outcome))
}

/// Resolve the landing route for an initial page load.
#[utoipa::path(
    get,
    path = "/api/v1/landing",
    responses(
        (status = 200, description = "Landing route", body = LandingResponse),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Session store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "landing",
    security([])
)]
#[get("/landing")]
pub async fn landing(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<LandingResponse>> {
    let authenticated = match session.existing_store(&state.sessions)? {
        Some(store) => SessionGateService::new(Arc::new(store))
            .is_authenticated()
            .await?,
        None => false,
    };
    Ok(web::Json(LandingResponse {
        redirect_uri: LandingRoute::for_session(authenticated),
        authenticated,
    }))
}

/// Report whether the caller is signed in and holds the admin role.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Session status", body = SessionStatus),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Session store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "sessionStatus"
)]
#[get("/session")]
pub async fn session_status(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionStatus>> {
    let Some(store) = session.existing_store(&state.sessions)? else {
        return Ok(web::Json(SessionStatus {
            authenticated: false,
            is_admin: false,
        }));
    };
    let gate = SessionGateService::new(Arc::new(store));
    Ok(web::Json(SessionStatus {
        authenticated: gate.is_authenticated().await?,
        is_admin: gate.is_admin().await?,
    }))
}

/// End the caller's session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Signed out", body = LogoutResponse),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Session store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let redirect_uri = match session.session_key()? {
        Some(key) => {
            LogoutService::new(Arc::new(state.sessions.scoped(key)))
                .logout()
                .await?
        }
        None => LandingRoute::Login,
    };
    session.forget();
    Ok(HttpResponse::Ok().json(LogoutResponse { redirect_uri }))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
