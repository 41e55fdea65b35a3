use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    Student = 0,
    Instructor = 1,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Instructor => "instructor",
        }
    }

    #[inline]
    pub const fn is_instructor(&self) -> bool {
        matches!(self, UserRole::Instructor)
    }

    /// Unknown ids are reported to the caller instead of panicking
    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(UserRole::Student),
            1 => Some(UserRole::Instructor),
            _ => {
                tracing::error!(role_id = id, "Invalid UserRole id");
                None
            }
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "student" => Some(UserRole::Student),
            "instructor" => Some(UserRole::Instructor),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_id() {
        assert_eq!(UserRole::from_id(0), Some(UserRole::Student));
        assert_eq!(UserRole::from_id(1), Some(UserRole::Instructor));
        assert_eq!(UserRole::from_id(7), None);
    }

    #[test]
    fn test_user_role_codes() {
        assert_eq!(UserRole::from_code("instructor"), Some(UserRole::Instructor));
        assert_eq!(UserRole::from_code("admin"), None);
        assert_eq!(UserRole::Student.to_string(), "student");
        assert_eq!(
            serde_json::to_string(&UserRole::Instructor).unwrap(),
            "\"instructor\""
        );
    }

    #[test]
    fn test_default_is_student() {
        assert_eq!(UserRole::default(), UserRole::Student);
        assert!(!UserRole::default().is_instructor());
    }
}
