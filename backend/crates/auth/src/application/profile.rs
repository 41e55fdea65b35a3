//! Profile Use Case
//!
//! Read and edit the signed-in user's profile, and self-service promotion
//! to instructor.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::display_name::DisplayName;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Default)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

pub struct ProfileUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
}

impl<U, S> ProfileUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>) -> Self {
        Self {
            user_repo,
            session_repo,
        }
    }

    pub async fn get(&self, user_id: &UserId) -> AuthResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn update(&self, user_id: &UserId, input: UpdateProfileInput) -> AuthResult<User> {
        let mut user = self.get(user_id).await?;

        let name = input.name.map(DisplayName::new).transpose()?;
        let photo_url = input
            .photo_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        user.update_profile(name, photo_url);
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.user_id, "Profile updated");
        Ok(user)
    }

    /// Promote to instructor and refresh the role on open sessions
    pub async fn become_instructor(&self, user_id: &UserId) -> AuthResult<User> {
        let mut user = self.get(user_id).await?;
        user.become_instructor()?;

        self.user_repo.update(&user).await?;
        let sessions = self
            .session_repo
            .update_role_for_user(user_id, user.role)
            .await?;

        tracing::info!(user_id = %user.user_id, sessions, "User became instructor");
        Ok(user)
    }
}
