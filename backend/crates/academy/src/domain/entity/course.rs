//! Course Entity

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, LectureId, UserId};

use crate::domain::value_object::course_level::CourseLevel;
use crate::error::{AcademyError, AcademyResult};

pub const TITLE_MAX_LENGTH: usize = 200;

#[derive(Debug, Clone)]
pub struct Course {
    pub course_id: CourseId,
    pub creator_id: UserId,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: String,
    pub level: Option<CourseLevel>,
    /// Minor currency units
    pub price: i64,
    pub thumbnail_url: Option<String>,
    pub is_published: bool,
    /// Lecture order, from `lectures.position`
    pub lecture_ids: Vec<LectureId>,
    /// From `enrollments`
    pub enrolled_student_ids: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial edit; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<CourseLevel>,
    pub price: Option<i64>,
    pub thumbnail_url: Option<String>,
}

pub(crate) fn required_text(field: &str, value: &str, max: usize) -> AcademyResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AcademyError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(AcademyError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}

fn optional_text(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl Course {
    /// Drafts start unpublished, free, and without lectures
    pub fn new(creator_id: UserId, title: &str, category: &str) -> AcademyResult<Self> {
        let now = Utc::now();

        Ok(Self {
            course_id: CourseId::new(),
            creator_id,
            title: required_text("Course title", title, TITLE_MAX_LENGTH)?,
            subtitle: None,
            description: None,
            category: required_text("Category", category, TITLE_MAX_LENGTH)?,
            level: None,
            price: 0,
            thumbnail_url: None,
            is_published: false,
            lecture_ids: Vec::new(),
            enrolled_student_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_creator(&self, user_id: &UserId) -> bool {
        &self.creator_id == user_id
    }

    pub fn ensure_creator(&self, user_id: &UserId) -> AcademyResult<()> {
        if self.is_creator(user_id) {
            Ok(())
        } else {
            Err(AcademyError::NotCourseOwner)
        }
    }

    /// Returns the replaced thumbnail URL, if any, so the caller can release it
    pub fn apply(&mut self, patch: CoursePatch) -> AcademyResult<Option<String>> {
        if let Some(title) = patch.title {
            self.title = required_text("Course title", &title, TITLE_MAX_LENGTH)?;
        }
        if let Some(category) = patch.category {
            self.category = required_text("Category", &category, TITLE_MAX_LENGTH)?;
        }
        if let Some(price) = patch.price {
            if price < 0 {
                return Err(AcademyError::Validation("Price cannot be negative".into()));
            }
            self.price = price;
        }
        if let Some(subtitle) = patch.subtitle {
            self.subtitle = optional_text(subtitle);
        }
        if let Some(description) = patch.description {
            self.description = optional_text(description);
        }
        if let Some(level) = patch.level {
            self.level = Some(level);
        }

        let mut replaced = None;
        if let Some(url) = patch.thumbnail_url.and_then(optional_text) {
            if self.thumbnail_url.as_deref() != Some(url.as_str()) {
                replaced = self.thumbnail_url.replace(url);
            }
        }

        self.updated_at = Utc::now();
        Ok(replaced)
    }

    pub fn set_published(&mut self, publish: bool) {
        self.is_published = publish;
        self.updated_at = Utc::now();
    }

    pub fn has_lecture(&self, lecture_id: &LectureId) -> bool {
        self.lecture_ids.contains(lecture_id)
    }

    pub fn is_enrolled(&self, user_id: &UserId) -> bool {
        self.enrolled_student_ids.contains(user_id)
    }
}
