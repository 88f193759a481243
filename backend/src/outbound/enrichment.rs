//! Profile canonicalisation applied to directory records before login.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{UserEnricher, UserEnrichmentError};
use crate::domain::{MobileNumber, User};

/// Enricher that tidies contact details pulled from the directory.
///
/// Names are trimmed and the phone number is rewritten to the `09xxxxxxxxx`
/// form. A phone number that cannot be normalised is dropped rather than
/// failing the login.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProfileEnricher;

impl ProfileEnricher {
    pub fn new() -> Self {
        Self
    }

    fn canonical_phone(user: &User) -> Option<String> {
        let raw = user.phone_number()?;
        match MobileNumber::parse(raw) {
            Ok(number) => Some(number.into()),
            Err(error) => {
                debug!(user_id = %user.id(), %error, "dropping unusable phone number");
                None
            }
        }
    }
}

#[async_trait]
impl UserEnricher for ProfileEnricher {
    async fn enrich(&self, user: &User) -> Result<User, UserEnrichmentError> {
        Ok(user.trimmed().with_phone_number(Self::canonical_phone(user)))
    }
}
