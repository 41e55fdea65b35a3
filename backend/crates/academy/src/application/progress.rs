//! Progress Use Cases

use std::sync::Arc;

use kernel::id::{CourseId, LectureId, UserId};

use crate::application::course::{CourseDetail, load_course, load_detail};
use crate::domain::entity::progress::{CourseProgress, LectureProgress};
use crate::domain::repository::AcademyStore;
use crate::error::{AcademyError, AcademyResult};

#[derive(Debug, Clone)]
pub struct ProgressView {
    pub course: CourseDetail,
    pub lectures: Vec<LectureProgress>,
    pub completed: bool,
}

pub struct ProgressUseCase<R>
where
    R: AcademyStore,
{
    store: Arc<R>,
}

impl<R> ProgressUseCase<R>
where
    R: AcademyStore,
{
    pub fn new(store: Arc<R>) -> Self {
        Self { store }
    }

    async fn load_or_new(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> AcademyResult<CourseProgress> {
        Ok(self
            .store
            .find_progress(user_id, course_id)
            .await?
            .unwrap_or_else(|| CourseProgress::new(*user_id, *course_id)))
    }

    /// Unstarted courses report an empty list
    pub async fn fetch(&self, user_id: &UserId, course_id: &CourseId) -> AcademyResult<ProgressView> {
        let course = load_detail(self.store.as_ref(), course_id).await?;
        let progress = self.store.find_progress(user_id, course_id).await?;

        let (lectures, completed) = match progress {
            Some(p) => (p.lectures, p.completed),
            None => (Vec::new(), false),
        };

        Ok(ProgressView {
            course,
            lectures,
            completed,
        })
    }

    pub async fn view_lecture(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
        lecture_id: &LectureId,
    ) -> AcademyResult<CourseProgress> {
        let course = load_course(self.store.as_ref(), course_id).await?;
        if !course.has_lecture(lecture_id) {
            return Err(AcademyError::LectureNotFound);
        }

        let mut progress = self.load_or_new(user_id, course_id).await?;
        let was_completed = progress.completed;

        progress.mark_viewed(*lecture_id);
        let completed = progress.refresh_completion(&course.lecture_ids);
        self.store.save_progress(&progress).await?;

        if completed && !was_completed {
            tracing::info!(user_id = %user_id, course_id = %course_id, "Course completed");
        } else {
            tracing::debug!(user_id = %user_id, lecture_id = %lecture_id, "Lecture viewed");
        }
        Ok(progress)
    }

    /// Marks every lecture viewed (or unviewed) together with the flag
    pub async fn set_completion(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
        completed: bool,
    ) -> AcademyResult<CourseProgress> {
        let course = load_course(self.store.as_ref(), course_id).await?;

        let mut progress = self.load_or_new(user_id, course_id).await?;
        progress.force(&course.lecture_ids, completed);
        self.store.save_progress(&progress).await?;

        tracing::info!(
            user_id = %user_id,
            course_id = %course_id,
            completed,
            "Course completion set"
        );
        Ok(progress)
    }
}
