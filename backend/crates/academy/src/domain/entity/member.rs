//! Member read model
//!
//! The slice of a user account this crate needs: display name and role.
//! Accounts themselves belong to the auth crate.

use auth::UserRole;
use kernel::id::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub user_id: UserId,
    pub name: String,
    pub role: UserRole,
    pub photo_url: Option<String>,
}

impl Member {
    pub fn is_instructor(&self) -> bool {
        self.role.is_instructor()
    }
}
