//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, UserId};

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub name: DisplayName,
    /// Unique, lower-cased login identifier
    pub email: Email,
    pub password: UserPassword,
    pub role: UserRole,
    pub photo_url: Option<String>,
    /// Read from `enrollments`; never written through this entity
    pub enrolled_course_ids: Vec<CourseId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// New accounts start as students with no enrollments
    pub fn new(name: DisplayName, email: Email, password: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            name,
            email,
            password,
            role: UserRole::Student,
            photo_url: None,
            enrolled_course_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_profile(&mut self, name: Option<DisplayName>, photo_url: Option<String>) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(url) = photo_url {
            self.photo_url = Some(url);
        }
        self.updated_at = Utc::now();
    }

    pub fn become_instructor(&mut self) -> AuthResult<()> {
        if self.role.is_instructor() {
            return Err(AuthError::AlreadyInstructor);
        }
        self.role = UserRole::Instructor;
        self.updated_at = Utc::now();
        Ok(())
    }
}
