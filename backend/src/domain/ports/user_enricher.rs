//! Port for augmenting a located user before it backs a session.

use async_trait::async_trait;

use crate::domain::User;

use super::define_port_error;

define_port_error! {
    /// Errors raised by user enrichment adapters.
    pub enum UserEnrichmentError {
        /// Upstream profile source failed.
        Upstream { message: String } => "profile source failed: {message}",
    }
}

/// Enrichment must be idempotent: enriching an enriched user again yields an
/// equivalent user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserEnricher: Send + Sync {
    /// Return an updated copy of `user`.
    async fn enrich(&self, user: &User) -> Result<User, UserEnrichmentError>;
}

/// Enricher that returns the user unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughEnricher;

#[async_trait]
impl UserEnricher for PassThroughEnricher {
    async fn enrich(&self, user: &User) -> Result<User, UserEnrichmentError> {
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserDraft;

    #[tokio::test]
    async fn pass_through_is_idempotent() {
        let user = User::try_new(UserDraft {
            id: "1024".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            phone_number: None,
            role: "Customer".to_owned(),
        })
        .expect("fixture user");

        let once = PassThroughEnricher.enrich(&user).await.expect("enrich");
        let twice = PassThroughEnricher.enrich(&once).await.expect("enrich again");
        assert_eq!(once, user);
        assert_eq!(twice, once);
    }
}
