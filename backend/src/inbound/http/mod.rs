//! HTTP inbound adapter exposing the login and session endpoints.

pub mod auth;
pub mod error;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::{ApiResult, json_config};
