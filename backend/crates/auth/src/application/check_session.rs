//! Check Session Use Case
//!
//! Resolves a cookie token to a live session bound to the caller's
//! fingerprint.

use std::sync::Arc;

use platform::client::ClientFingerprint;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::AuthSessionRepository;
use crate::error::{AuthError, AuthResult};

pub struct CheckSessionUseCase<S>
where
    S: AuthSessionRepository + Send + Sync + 'static,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: AuthSessionRepository + Send + Sync + 'static,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn is_valid(&self, session_token: &str, fingerprint: &ClientFingerprint) -> bool {
        self.get_session(session_token, fingerprint).await.is_ok()
    }

    /// Validate the token and record activity
    pub async fn get_session(
        &self,
        session_token: &str,
        fingerprint: &ClientFingerprint,
    ) -> AuthResult<AuthSession> {
        let session_id = session_token::parse(&self.config.session_secret, session_token)?;

        let mut session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            self.session_repo.delete(session_id).await?;
            return Err(AuthError::SessionInvalid);
        }

        if !fingerprint.matches(&session.client_fingerprint_hash) {
            tracing::warn!(session_id = %session_id, "Auth session fingerprint mismatch");
            return Err(AuthError::SessionFingerprintMismatch);
        }

        session.touch();
        session.extend_if_needed(self.config.session_ttl_chrono());

        // Activity bookkeeping must not fail the request
        let snapshot = session.clone();
        let repo = self.session_repo.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.update(&snapshot).await {
                tracing::warn!(error = %e, "Failed to update session activity");
            }
        });

        Ok(session)
    }
}
