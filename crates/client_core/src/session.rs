//! In-memory sign-in session layered over any [`AuthGateway`].

use std::sync::Arc;

use async_trait::async_trait;
use shared::{error::RemoteError, protocol::UserProfile};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::auth_gateway::AuthGateway;

/// Remembers the last signed-in profile. A repeat sign-in for the same
/// email returns it without contacting the inner gateway; the password is
/// not re-checked.
pub struct SessionGateway {
    inner: Arc<dyn AuthGateway>,
    session: RwLock<Option<UserProfile>>,
}

impl SessionGateway {
    pub fn new(inner: Arc<dyn AuthGateway>) -> Self {
        Self {
            inner,
            session: RwLock::new(None),
        }
    }

    pub async fn current_user(&self) -> Option<UserProfile> {
        self.session.read().await.clone()
    }

    pub async fn is_signed_in(&self, email: &str) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .is_some_and(|profile| profile.email == email)
    }

    /// Returns the profile that was signed in, if any.
    pub async fn sign_out(&self) -> Option<UserProfile> {
        let previous = self.session.write().await.take();
        if let Some(profile) = &previous {
            info!(user_id = %profile.id, "signed out");
        }
        previous
    }
}

#[async_trait]
impl AuthGateway for SessionGateway {
    async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, RemoteError> {
        if let Some(profile) = self
            .session
            .read()
            .await
            .as_ref()
            .filter(|profile| profile.email == email)
        {
            debug!(user_id = %profile.id, "reusing existing session");
            return Ok(profile.clone());
        }

        let profile = self.inner.sign_in(email, password).await?;
        *self.session.write().await = Some(profile.clone());
        info!(user_id = %profile.id, "session started");
        Ok(profile)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
