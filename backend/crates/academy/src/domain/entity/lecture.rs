//! Lecture Entity

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, LectureId};

use crate::domain::entity::course::{TITLE_MAX_LENGTH, required_text};
use crate::error::AcademyResult;

#[derive(Debug, Clone)]
pub struct Lecture {
    pub lecture_id: LectureId,
    pub course_id: CourseId,
    pub title: String,
    pub video_url: Option<String>,
    /// Media store id for deleting the video
    pub video_media_id: Option<String>,
    pub is_preview_free: bool,
    /// Zero-based order within the course; assigned on append
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct LecturePatch {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub video_media_id: Option<String>,
    pub is_preview_free: Option<bool>,
}

impl Lecture {
    pub fn new(course_id: CourseId, title: &str) -> AcademyResult<Self> {
        let now = Utc::now();

        Ok(Self {
            lecture_id: LectureId::new(),
            course_id,
            title: required_text("Lecture title", title, TITLE_MAX_LENGTH)?,
            video_url: None,
            video_media_id: None,
            is_preview_free: false,
            position: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the media id of a replaced video, if any
    pub fn apply(&mut self, patch: LecturePatch) -> AcademyResult<Option<String>> {
        if let Some(title) = patch.title {
            self.title = required_text("Lecture title", &title, TITLE_MAX_LENGTH)?;
        }
        if let Some(preview) = patch.is_preview_free {
            self.is_preview_free = preview;
        }

        let mut replaced = None;
        if let Some(url) = patch.video_url {
            self.video_url = Some(url);
            if patch.video_media_id.is_some() && patch.video_media_id != self.video_media_id {
                replaced = std::mem::replace(&mut self.video_media_id, patch.video_media_id);
            }
        }

        self.updated_at = Utc::now();
        Ok(replaced)
    }
}
