//! Course Use Cases
//!
//! Authoring (instructor-only create, creator-only mutation) and the public
//! catalogue.

use std::collections::HashMap;
use std::sync::Arc;

use auth::CurrentUser;
use kernel::id::{CourseId, UserId};

use crate::application::config::AcademyConfig;
use crate::domain::entity::{
    course::{Course, CoursePatch},
    lecture::Lecture,
    member::Member,
};
use crate::domain::repository::AcademyStore;
use crate::domain::value_object::{media::ReleasedMedia, search::CourseSearch};
use crate::error::{AcademyError, AcademyResult};

/// Course with its creator, for listings
#[derive(Debug, Clone)]
pub struct CourseCard {
    pub course: Course,
    pub creator: Option<Member>,
}

/// Course with its creator and ordered lectures
#[derive(Debug, Clone)]
pub struct CourseDetail {
    pub course: Course,
    pub creator: Option<Member>,
    pub lectures: Vec<Lecture>,
}

pub(crate) async fn load_course<R: AcademyStore>(
    store: &R,
    course_id: &CourseId,
) -> AcademyResult<Course> {
    store
        .find_course(course_id)
        .await?
        .ok_or(AcademyError::CourseNotFound)
}

pub(crate) async fn load_detail<R: AcademyStore>(
    store: &R,
    course_id: &CourseId,
) -> AcademyResult<CourseDetail> {
    let course = load_course(store, course_id).await?;
    let creator = store.find_member(&course.creator_id).await?;
    let lectures = store.list_lectures(course_id).await?;

    Ok(CourseDetail {
        course,
        creator,
        lectures,
    })
}

/// Attach creators with a single member lookup
pub(crate) async fn into_cards<R: AcademyStore>(
    store: &R,
    courses: Vec<Course>,
) -> AcademyResult<Vec<CourseCard>> {
    let mut creator_ids: Vec<UserId> = courses.iter().map(|c| c.creator_id).collect();
    creator_ids.sort();
    creator_ids.dedup();

    let members: HashMap<UserId, Member> = store
        .find_members(&creator_ids)
        .await?
        .into_iter()
        .map(|m| (m.user_id, m))
        .collect();

    Ok(courses
        .into_iter()
        .map(|course| CourseCard {
            creator: members.get(&course.creator_id).cloned(),
            course,
        })
        .collect())
}

pub struct CourseUseCase<R>
where
    R: AcademyStore,
{
    store: Arc<R>,
    config: Arc<AcademyConfig>,
}

impl<R> CourseUseCase<R>
where
    R: AcademyStore,
{
    pub fn new(store: Arc<R>, config: Arc<AcademyConfig>) -> Self {
        Self { store, config }
    }

    pub async fn create(
        &self,
        current: &CurrentUser,
        title: &str,
        category: &str,
    ) -> AcademyResult<Course> {
        if !current.role.is_instructor() {
            return Err(AcademyError::InstructorOnly);
        }

        let course = Course::new(current.user_id, title, category)?;
        self.store.create_course(&course).await?;

        tracing::info!(
            course_id = %course.course_id,
            creator_id = %course.creator_id,
            "Course created"
        );
        Ok(course)
    }

    pub async fn list_for_creator(&self, current: &CurrentUser) -> AcademyResult<Vec<Course>> {
        self.store.list_courses_by_creator(&current.user_id).await
    }

    pub async fn get(&self, course_id: &CourseId) -> AcademyResult<CourseDetail> {
        load_detail(self.store.as_ref(), course_id).await
    }

    pub async fn edit(
        &self,
        current: &CurrentUser,
        course_id: &CourseId,
        patch: CoursePatch,
    ) -> AcademyResult<Course> {
        let mut course = load_course(self.store.as_ref(), course_id).await?;
        course.ensure_creator(&current.user_id)?;

        let replaced = course.apply(patch)?;
        self.store.update_course(&course).await?;

        let mut released = ReleasedMedia::default();
        released.push_image_url(replaced.as_deref());
        if !released.is_empty() {
            tracing::info!(course_id = %course.course_id, images = ?released.images, "Course thumbnail replaced");
        }

        tracing::info!(course_id = %course.course_id, "Course updated");
        Ok(course)
    }

    pub async fn set_published(
        &self,
        current: &CurrentUser,
        course_id: &CourseId,
        publish: bool,
    ) -> AcademyResult<Course> {
        let mut course = load_course(self.store.as_ref(), course_id).await?;
        course.ensure_creator(&current.user_id)?;

        course.set_published(publish);
        self.store.update_course(&course).await?;

        tracing::info!(course_id = %course.course_id, published = publish, "Course publish state changed");
        Ok(course)
    }

    /// Returns media the caller should delete from the media store
    pub async fn delete(
        &self,
        current: &CurrentUser,
        course_id: &CourseId,
    ) -> AcademyResult<ReleasedMedia> {
        let course = load_course(self.store.as_ref(), course_id).await?;
        course.ensure_creator(&current.user_id)?;

        let released = self.store.delete_course(course_id).await?;

        tracing::info!(
            course_id = %course_id,
            released_media = released.len(),
            images = ?released.images,
            videos = ?released.videos,
            "Course deleted"
        );
        Ok(released)
    }

    pub async fn search(&self, search: &CourseSearch) -> AcademyResult<Vec<CourseCard>> {
        let courses = self.store.search_published(search).await?;
        into_cards(self.store.as_ref(), courses).await
    }

    pub async fn published(&self) -> AcademyResult<Vec<CourseCard>> {
        self.search(&CourseSearch::default()).await
    }

    pub async fn suggestions(&self) -> AcademyResult<Vec<CourseCard>> {
        let courses = self
            .store
            .latest_published(self.config.suggestion_limit)
            .await?;
        into_cards(self.store.as_ref(), courses).await
    }
}
