use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseLevel {
    Beginner,
    Medium,
    Advance,
}

impl CourseLevel {
    pub const fn code(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "Beginner",
            CourseLevel::Medium => "Medium",
            CourseLevel::Advance => "Advance",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Beginner" => Some(CourseLevel::Beginner),
            "Medium" => Some(CourseLevel::Medium),
            "Advance" => Some(CourseLevel::Advance),
            _ => None,
        }
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
