//! Lecture Use Cases

use std::sync::Arc;

use auth::CurrentUser;
use kernel::id::{CourseId, LectureId};

use crate::application::course::load_course;
use crate::domain::entity::lecture::{Lecture, LecturePatch};
use crate::domain::repository::AcademyStore;
use crate::domain::value_object::media::ReleasedMedia;
use crate::error::{AcademyError, AcademyResult};

pub struct LectureUseCase<R>
where
    R: AcademyStore,
{
    store: Arc<R>,
}

impl<R> LectureUseCase<R>
where
    R: AcademyStore,
{
    pub fn new(store: Arc<R>) -> Self {
        Self { store }
    }

    async fn load(&self, lecture_id: &LectureId) -> AcademyResult<Lecture> {
        self.store
            .find_lecture(lecture_id)
            .await?
            .ok_or(AcademyError::LectureNotFound)
    }

    /// Appended after the existing lectures
    pub async fn create(
        &self,
        current: &CurrentUser,
        course_id: &CourseId,
        title: &str,
    ) -> AcademyResult<Lecture> {
        let course = load_course(self.store.as_ref(), course_id).await?;
        course.ensure_creator(&current.user_id)?;

        let lecture = Lecture::new(course.course_id, title)?;
        let lecture = self.store.append_lecture(&lecture).await?;

        tracing::info!(
            course_id = %course_id,
            lecture_id = %lecture.lecture_id,
            position = lecture.position,
            "Lecture created"
        );
        Ok(lecture)
    }

    pub async fn list(&self, course_id: &CourseId) -> AcademyResult<Vec<Lecture>> {
        load_course(self.store.as_ref(), course_id).await?;
        self.store.list_lectures(course_id).await
    }

    pub async fn get(&self, lecture_id: &LectureId) -> AcademyResult<Lecture> {
        self.load(lecture_id).await
    }

    pub async fn edit(
        &self,
        current: &CurrentUser,
        course_id: &CourseId,
        lecture_id: &LectureId,
        patch: LecturePatch,
    ) -> AcademyResult<Lecture> {
        let course = load_course(self.store.as_ref(), course_id).await?;
        course.ensure_creator(&current.user_id)?;

        let mut lecture = self.load(lecture_id).await?;
        if lecture.course_id != course.course_id {
            return Err(AcademyError::LectureNotFound);
        }

        let replaced = lecture.apply(patch)?;
        self.store.update_lecture(&lecture).await?;

        if let Some(video) = replaced {
            tracing::info!(lecture_id = %lecture_id, video = %video, "Lecture video replaced");
        }
        Ok(lecture)
    }

    /// Returns the lecture video to delete from the media store
    pub async fn remove(
        &self,
        current: &CurrentUser,
        lecture_id: &LectureId,
    ) -> AcademyResult<ReleasedMedia> {
        let lecture = self.load(lecture_id).await?;
        let course = load_course(self.store.as_ref(), &lecture.course_id).await?;
        course.ensure_creator(&current.user_id)?;

        self.store.remove_lecture(lecture_id).await?;

        let mut released = ReleasedMedia::default();
        released.push_video_id(lecture.video_media_id.as_deref());

        tracing::info!(
            course_id = %course.course_id,
            lecture_id = %lecture_id,
            videos = ?released.videos,
            "Lecture removed"
        );
        Ok(released)
    }
}
