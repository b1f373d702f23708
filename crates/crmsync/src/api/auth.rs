//! Simulated session endpoints.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::time::sleep;
use uuid::Uuid;

use crmsync_core::auth::{authenticate, demo_user, AuthResponse, Credentials, SessionToken, User};

use super::{latency, ApiError, Result};

/// Session boundary over the single demo account.
///
/// Holds the token of the active session. Clones share it.
#[derive(Debug, Clone, Default)]
pub struct SessionApi {
    token: Arc<RwLock<Option<SessionToken>>>,
}

impl SessionApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signs in with `credentials` and stores a fresh token.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        sleep(latency::LOGIN).await;

        let user = authenticate(credentials).inspect_err(|_| {
            tracing::warn!(email = %credentials.email, "Rejected login");
        })?;
        let token = SessionToken::mock(Uuid::new_v4());
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());

        tracing::info!(user_id = %user.id, email = %user.email, "Logged in");
        Ok(AuthResponse { user, token })
    }

    /// Returns the signed-in user.
    pub async fn current_user(&self) -> Result<User> {
        sleep(latency::CURRENT_USER).await;
        self.require()?;
        Ok(demo_user())
    }

    /// Drops the token. Logging out without a session is not an error.
    pub async fn logout(&self) -> Result<()> {
        sleep(latency::LOGOUT).await;
        let previous = self
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            tracing::info!("Logged out");
        }
        Ok(())
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Fails with `ApiError::Unauthenticated` when no session is active.
    pub fn require(&self) -> Result<SessionToken> {
        self.token().ok_or(ApiError::Unauthenticated)
    }
}
