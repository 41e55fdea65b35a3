//! Repository Traits
//!
//! Method names are unique across traits so a single store can implement
//! all of them without call-site ambiguity.

use kernel::id::{CourseId, LectureId, UserId};

use crate::domain::entity::{
    course::Course,
    lecture::Lecture,
    member::Member,
    progress::CourseProgress,
    purchase::{CoursePurchase, PurchaseStatus, SettleOutcome},
};
use crate::domain::value_object::{
    media::ReleasedMedia, payment_reference::PaymentReference, search::CourseSearch,
};
use crate::error::AcademyResult;

#[trait_variant::make(CourseRepository: Send)]
pub trait LocalCourseRepository {
    async fn create_course(&self, course: &Course) -> AcademyResult<()>;

    /// Course with its ordered lecture ids and enrolled students
    async fn find_course(&self, course_id: &CourseId) -> AcademyResult<Option<Course>>;

    async fn list_courses_by_creator(&self, creator_id: &UserId) -> AcademyResult<Vec<Course>>;

    /// Persist editable fields and the published flag
    async fn update_course(&self, course: &Course) -> AcademyResult<()>;

    /// Remove the course with its lectures, purchases, progress and
    /// enrollments in one transaction
    async fn delete_course(&self, course_id: &CourseId) -> AcademyResult<ReleasedMedia>;

    async fn search_published(&self, search: &CourseSearch) -> AcademyResult<Vec<Course>>;

    /// Most recently created published courses
    async fn latest_published(&self, limit: i64) -> AcademyResult<Vec<Course>>;
}

#[trait_variant::make(LectureRepository: Send)]
pub trait LocalLectureRepository {
    /// Insert at the end of the course; returns the lecture with its position
    async fn append_lecture(&self, lecture: &Lecture) -> AcademyResult<Lecture>;

    async fn find_lecture(&self, lecture_id: &LectureId) -> AcademyResult<Option<Lecture>>;

    /// Ordered by position
    async fn list_lectures(&self, course_id: &CourseId) -> AcademyResult<Vec<Lecture>>;

    async fn update_lecture(&self, lecture: &Lecture) -> AcademyResult<()>;

    /// Delete the lecture and its progress entries in one transaction
    async fn remove_lecture(&self, lecture_id: &LectureId) -> AcademyResult<()>;
}

#[trait_variant::make(PurchaseRepository: Send)]
pub trait LocalPurchaseRepository {
    async fn find_completed_purchase(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> AcademyResult<Option<CoursePurchase>>;

    /// Drop any pending purchase for the same (user, course) and insert
    /// this one, atomically. Returns how many pending rows were replaced.
    async fn replace_pending_purchase(&self, purchase: &CoursePurchase) -> AcademyResult<u64>;

    async fn find_purchase_by_reference(
        &self,
        reference: &PaymentReference,
    ) -> AcademyResult<Option<CoursePurchase>>;

    /// Apply a gateway outcome. A completed settle also marks every lecture
    /// of the course preview-free and enrolls the buyer, all in one
    /// transaction. Concurrent callers apply side effects at most once.
    async fn settle_purchase(
        &self,
        reference: &PaymentReference,
        outcome: PurchaseStatus,
    ) -> AcademyResult<SettleOutcome>;

    async fn list_completed_purchases(&self, user_id: &UserId)
    -> AcademyResult<Vec<CoursePurchase>>;
}

#[trait_variant::make(ProgressRepository: Send)]
pub trait LocalProgressRepository {
    async fn find_progress(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> AcademyResult<Option<CourseProgress>>;

    /// Upsert the record and replace its lecture entries
    async fn save_progress(&self, progress: &CourseProgress) -> AcademyResult<()>;
}

#[trait_variant::make(MemberRepository: Send)]
pub trait LocalMemberRepository {
    async fn find_member(&self, user_id: &UserId) -> AcademyResult<Option<Member>>;

    async fn find_members(&self, user_ids: &[UserId]) -> AcademyResult<Vec<Member>>;
}

#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Delete a user and everything they own in one transaction: their
    /// courses (with lectures, purchases, progress, enrollments), their own
    /// purchases, progress, enrollments and sessions. Unknown users yield
    /// an empty result, so repeating the call is harmless.
    async fn purge_account(&self, user_id: &UserId) -> AcademyResult<ReleasedMedia>;
}

/// Everything the academy use cases need from storage
pub trait AcademyStore:
    CourseRepository
    + LectureRepository
    + PurchaseRepository
    + ProgressRepository
    + MemberRepository
    + AccountRepository
    + Send
    + Sync
    + 'static
{
}

impl<T> AcademyStore for T where
    T: CourseRepository
        + LectureRepository
        + PurchaseRepository
        + ProgressRepository
        + MemberRepository
        + AccountRepository
        + Send
        + Sync
        + 'static
{
}
