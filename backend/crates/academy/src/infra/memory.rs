//! In-memory repository
//!
//! Same contracts as `PgAcademyRepository`. Everything sits behind one
//! `RwLock` so multi-entity operations are atomic like their SQL
//! transactions.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, LectureId, PurchaseId, UserId};
use tokio::sync::RwLock;

use crate::domain::entity::{
    course::Course,
    lecture::Lecture,
    member::Member,
    progress::CourseProgress,
    purchase::{CoursePurchase, PurchaseStatus, SettleOutcome},
};
use crate::domain::repository::{
    AccountRepository, CourseRepository, LectureRepository, MemberRepository, ProgressRepository,
    PurchaseRepository,
};
use crate::domain::value_object::{
    media::ReleasedMedia,
    payment_reference::PaymentReference,
    search::{CourseSearch, PriceSort},
};
use crate::error::{AcademyError, AcademyResult};

#[derive(Default)]
struct AcademyData {
    courses: HashMap<CourseId, Course>,
    lectures: HashMap<LectureId, Lecture>,
    purchases: HashMap<PurchaseId, CoursePurchase>,
    progress: HashMap<(UserId, CourseId), CourseProgress>,
    members: HashMap<UserId, Member>,
    enrollments: Vec<(UserId, CourseId, DateTime<Utc>)>,
}

impl AcademyData {
    /// Fill the derived lecture and enrollment lists
    fn hydrate(&self, course: &Course) -> Course {
        let mut course = course.clone();

        let mut lectures: Vec<&Lecture> = self
            .lectures
            .values()
            .filter(|l| l.course_id == course.course_id)
            .collect();
        lectures.sort_by_key(|l| l.position);
        course.lecture_ids = lectures.iter().map(|l| l.lecture_id).collect();

        course.enrolled_student_ids = self
            .enrollments
            .iter()
            .filter(|(_, c, _)| *c == course.course_id)
            .map(|(u, _, _)| *u)
            .collect();
        course
    }

    fn enroll(&mut self, user_id: UserId, course_id: CourseId) {
        let exists = self
            .enrollments
            .iter()
            .any(|(u, c, _)| *u == user_id && *c == course_id);
        if !exists {
            self.enrollments.push((user_id, course_id, Utc::now()));
        }
    }

    fn drop_course(&mut self, course_id: &CourseId) -> ReleasedMedia {
        let mut released = ReleasedMedia::default();

        let Some(course) = self.courses.remove(course_id) else {
            return released;
        };
        released.push_image_url(course.thumbnail_url.as_deref());

        let mut lectures: Vec<Lecture> = self
            .lectures
            .values()
            .filter(|l| &l.course_id == course_id)
            .cloned()
            .collect();
        lectures.sort_by_key(|l| l.position);
        for lecture in lectures {
            released.push_video_id(lecture.video_media_id.as_deref());
            self.lectures.remove(&lecture.lecture_id);
        }

        self.purchases.retain(|_, p| &p.course_id != course_id);
        self.progress.retain(|(_, c), _| c != course_id);
        self.enrollments.retain(|(_, c, _)| c != course_id);
        released
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAcademyRepository {
    data: Arc<RwLock<AcademyData>>,
}

impl InMemoryAcademyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user profile. The SQL store reads these from `users`.
    pub async fn seed_member(&self, member: Member) {
        self.data
            .write()
            .await
            .members
            .insert(member.user_id, member);
    }

    pub async fn enrollment_count(&self, course_id: &CourseId) -> usize {
        self.data
            .read()
            .await
            .enrollments
            .iter()
            .filter(|(_, c, _)| c == course_id)
            .count()
    }

    pub async fn purchase_count(&self, user_id: &UserId, course_id: &CourseId) -> usize {
        self.data
            .read()
            .await
            .purchases
            .values()
            .filter(|p| &p.user_id == user_id && &p.course_id == course_id)
            .count()
    }
}

// ============================================================================
// Course Repository
// ============================================================================

impl CourseRepository for InMemoryAcademyRepository {
    async fn create_course(&self, course: &Course) -> AcademyResult<()> {
        self.data
            .write()
            .await
            .courses
            .insert(course.course_id, course.clone());
        Ok(())
    }

    async fn find_course(&self, course_id: &CourseId) -> AcademyResult<Option<Course>> {
        let data = self.data.read().await;
        Ok(data.courses.get(course_id).map(|c| data.hydrate(c)))
    }

    async fn list_courses_by_creator(&self, creator_id: &UserId) -> AcademyResult<Vec<Course>> {
        let data = self.data.read().await;
        let mut courses: Vec<Course> = data
            .courses
            .values()
            .filter(|c| &c.creator_id == creator_id)
            .map(|c| data.hydrate(c))
            .collect();
        courses.sort_by_key(|c| Reverse(c.created_at));
        Ok(courses)
    }

    async fn update_course(&self, course: &Course) -> AcademyResult<()> {
        let mut data = self.data.write().await;
        let stored = data
            .courses
            .get_mut(&course.course_id)
            .ok_or(AcademyError::CourseNotFound)?;
        *stored = course.clone();
        Ok(())
    }

    async fn delete_course(&self, course_id: &CourseId) -> AcademyResult<ReleasedMedia> {
        Ok(self.data.write().await.drop_course(course_id))
    }

    async fn search_published(&self, search: &CourseSearch) -> AcademyResult<Vec<Course>> {
        let data = self.data.read().await;
        let mut courses: Vec<Course> = data
            .courses
            .values()
            .filter(|c| c.is_published)
            .filter(|c| search.matches(&c.title, c.subtitle.as_deref(), &c.category))
            .map(|c| data.hydrate(c))
            .collect();

        courses.sort_by_key(|c| Reverse(c.created_at));
        match search.sort_by_price {
            Some(PriceSort::Low) => courses.sort_by_key(|c| c.price),
            Some(PriceSort::High) => courses.sort_by_key(|c| Reverse(c.price)),
            None => {}
        }
        Ok(courses)
    }

    async fn latest_published(&self, limit: i64) -> AcademyResult<Vec<Course>> {
        let data = self.data.read().await;
        let mut courses: Vec<Course> = data
            .courses
            .values()
            .filter(|c| c.is_published)
            .map(|c| data.hydrate(c))
            .collect();
        courses.sort_by_key(|c| Reverse(c.created_at));
        courses.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(courses)
    }
}

// ============================================================================
// Lecture Repository
// ============================================================================

impl LectureRepository for InMemoryAcademyRepository {
    async fn append_lecture(&self, lecture: &Lecture) -> AcademyResult<Lecture> {
        let mut data = self.data.write().await;
        if !data.courses.contains_key(&lecture.course_id) {
            return Err(AcademyError::CourseNotFound);
        }

        let position = data
            .lectures
            .values()
            .filter(|l| l.course_id == lecture.course_id)
            .map(|l| l.position + 1)
            .max()
            .unwrap_or(0);

        let mut lecture = lecture.clone();
        lecture.position = position;
        data.lectures.insert(lecture.lecture_id, lecture.clone());
        Ok(lecture)
    }

    async fn find_lecture(&self, lecture_id: &LectureId) -> AcademyResult<Option<Lecture>> {
        Ok(self.data.read().await.lectures.get(lecture_id).cloned())
    }

    async fn list_lectures(&self, course_id: &CourseId) -> AcademyResult<Vec<Lecture>> {
        let data = self.data.read().await;
        let mut lectures: Vec<Lecture> = data
            .lectures
            .values()
            .filter(|l| &l.course_id == course_id)
            .cloned()
            .collect();
        lectures.sort_by_key(|l| l.position);
        Ok(lectures)
    }

    async fn update_lecture(&self, lecture: &Lecture) -> AcademyResult<()> {
        let mut data = self.data.write().await;
        let stored = data
            .lectures
            .get_mut(&lecture.lecture_id)
            .ok_or(AcademyError::LectureNotFound)?;
        let position = stored.position;
        *stored = lecture.clone();
        stored.position = position;
        Ok(())
    }

    async fn remove_lecture(&self, lecture_id: &LectureId) -> AcademyResult<()> {
        let mut data = self.data.write().await;
        let Some(lecture) = data.lectures.remove(lecture_id) else {
            return Ok(());
        };

        for progress in data
            .progress
            .values_mut()
            .filter(|p| p.course_id == lecture.course_id)
        {
            progress.forget_lecture(lecture_id);
        }
        Ok(())
    }
}

// ============================================================================
// Purchase Repository
// ============================================================================

impl PurchaseRepository for InMemoryAcademyRepository {
    async fn find_completed_purchase(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> AcademyResult<Option<CoursePurchase>> {
        Ok(self
            .data
            .read()
            .await
            .purchases
            .values()
            .find(|p| {
                &p.user_id == user_id
                    && &p.course_id == course_id
                    && p.status == PurchaseStatus::Completed
            })
            .cloned())
    }

    async fn replace_pending_purchase(&self, purchase: &CoursePurchase) -> AcademyResult<u64> {
        let mut data = self.data.write().await;

        let before = data.purchases.len();
        data.purchases.retain(|_, p| {
            !(p.user_id == purchase.user_id
                && p.course_id == purchase.course_id
                && p.status == PurchaseStatus::Pending)
        });
        let removed = (before - data.purchases.len()) as u64;

        data.purchases.insert(purchase.purchase_id, purchase.clone());
        Ok(removed)
    }

    async fn find_purchase_by_reference(
        &self,
        reference: &PaymentReference,
    ) -> AcademyResult<Option<CoursePurchase>> {
        Ok(self
            .data
            .read()
            .await
            .purchases
            .values()
            .find(|p| &p.reference == reference)
            .cloned())
    }

    async fn settle_purchase(
        &self,
        reference: &PaymentReference,
        outcome: PurchaseStatus,
    ) -> AcademyResult<SettleOutcome> {
        let mut data = self.data.write().await;

        let Some(current) = data
            .purchases
            .values()
            .find(|p| &p.reference == reference)
            .cloned()
        else {
            return Ok(SettleOutcome::NotPending);
        };

        if current.status == PurchaseStatus::Completed {
            return Ok(SettleOutcome::AlreadyCompleted(current));
        }
        if current.status != PurchaseStatus::Pending {
            return Ok(SettleOutcome::NotPending);
        }

        // One completed purchase per pair, like the partial unique index.
        let paid_elsewhere = outcome == PurchaseStatus::Completed
            && data.purchases.values().any(|p| {
                p.user_id == current.user_id
                    && p.course_id == current.course_id
                    && p.status == PurchaseStatus::Completed
            });
        let outcome = if paid_elsewhere {
            PurchaseStatus::Failed
        } else {
            outcome
        };

        let Some(purchase) = data.purchases.get_mut(&current.purchase_id) else {
            return Ok(SettleOutcome::NotPending);
        };
        if !purchase.settle(outcome) {
            return Ok(SettleOutcome::NotPending);
        }
        let settled = purchase.clone();

        if paid_elsewhere {
            return Ok(SettleOutcome::Duplicate(settled));
        }

        if settled.status == PurchaseStatus::Completed {
            for lecture in data
                .lectures
                .values_mut()
                .filter(|l| l.course_id == settled.course_id)
            {
                lecture.is_preview_free = true;
            }
            data.enroll(settled.user_id, settled.course_id);
        }
        Ok(SettleOutcome::Settled(settled))
    }

    async fn list_completed_purchases(
        &self,
        user_id: &UserId,
    ) -> AcademyResult<Vec<CoursePurchase>> {
        let mut purchases: Vec<CoursePurchase> = self
            .data
            .read()
            .await
            .purchases
            .values()
            .filter(|p| &p.user_id == user_id && p.status == PurchaseStatus::Completed)
            .cloned()
            .collect();
        purchases.sort_by_key(|p| Reverse(p.updated_at));
        Ok(purchases)
    }
}

// ============================================================================
// Progress Repository
// ============================================================================

impl ProgressRepository for InMemoryAcademyRepository {
    async fn find_progress(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> AcademyResult<Option<CourseProgress>> {
        Ok(self
            .data
            .read()
            .await
            .progress
            .get(&(*user_id, *course_id))
            .cloned())
    }

    async fn save_progress(&self, progress: &CourseProgress) -> AcademyResult<()> {
        let mut data = self.data.write().await;
        let stored = data
            .progress
            .entry((progress.user_id, progress.course_id))
            .or_insert_with(|| CourseProgress::new(progress.user_id, progress.course_id));

        // Upsert per lecture, like the SQL store
        for entry in &progress.lectures {
            match stored
                .lectures
                .iter_mut()
                .find(|l| l.lecture_id == entry.lecture_id)
            {
                Some(existing) => existing.viewed = entry.viewed,
                None => stored.lectures.push(*entry),
            }
        }
        stored.completed = progress.completed;
        stored.updated_at = progress.updated_at;
        Ok(())
    }
}

// ============================================================================
// Member & Account Repositories
// ============================================================================

impl MemberRepository for InMemoryAcademyRepository {
    async fn find_member(&self, user_id: &UserId) -> AcademyResult<Option<Member>> {
        Ok(self.data.read().await.members.get(user_id).cloned())
    }

    async fn find_members(&self, user_ids: &[UserId]) -> AcademyResult<Vec<Member>> {
        let data = self.data.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| data.members.get(id).cloned())
            .collect())
    }
}

impl AccountRepository for InMemoryAcademyRepository {
    async fn purge_account(&self, user_id: &UserId) -> AcademyResult<ReleasedMedia> {
        let mut data = self.data.write().await;
        let mut released = ReleasedMedia::default();

        let owned: Vec<CourseId> = data
            .courses
            .values()
            .filter(|c| &c.creator_id == user_id)
            .map(|c| c.course_id)
            .collect();
        for course_id in owned {
            released.extend(data.drop_course(&course_id));
        }

        data.purchases.retain(|_, p| &p.user_id != user_id);
        data.progress.retain(|(u, _), _| u != user_id);
        data.enrollments.retain(|(u, _, _)| u != user_id);

        if let Some(member) = data.members.remove(user_id) {
            released.push_image_url(member.photo_url.as_deref());
        }
        Ok(released)
    }
}
