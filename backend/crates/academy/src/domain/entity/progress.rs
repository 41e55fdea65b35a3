//! Course Progress Entity
//!
//! One record per (learner, course), created lazily on the first view.

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, LectureId, UserId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureProgress {
    pub lecture_id: LectureId,
    pub viewed: bool,
}

#[derive(Debug, Clone)]
pub struct CourseProgress {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub lectures: Vec<LectureProgress>,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl CourseProgress {
    pub fn new(user_id: UserId, course_id: CourseId) -> Self {
        Self {
            user_id,
            course_id,
            lectures: Vec::new(),
            completed: false,
            updated_at: Utc::now(),
        }
    }

    /// Idempotent upsert of `viewed = true`
    pub fn mark_viewed(&mut self, lecture_id: LectureId) {
        match self.lectures.iter_mut().find(|l| l.lecture_id == lecture_id) {
            Some(entry) => entry.viewed = true,
            None => self.lectures.push(LectureProgress {
                lecture_id,
                viewed: true,
            }),
        }
        self.updated_at = Utc::now();
    }

    /// Distinct viewed lectures that still belong to the course
    pub fn viewed_count(&self, course_lectures: &[LectureId]) -> usize {
        course_lectures
            .iter()
            .filter(|id| {
                self.lectures
                    .iter()
                    .any(|l| &l.lecture_id == *id && l.viewed)
            })
            .count()
    }

    /// Completes once every course lecture has been viewed. Never
    /// un-completes; only `force` does that.
    pub fn refresh_completion(&mut self, course_lectures: &[LectureId]) -> bool {
        if !self.completed
            && !course_lectures.is_empty()
            && self.viewed_count(course_lectures) == course_lectures.len()
        {
            self.completed = true;
            self.updated_at = Utc::now();
        }
        self.completed
    }

    /// Set every lecture of the course, and the completed flag, to `completed`
    pub fn force(&mut self, course_lectures: &[LectureId], completed: bool) {
        self.lectures = course_lectures
            .iter()
            .map(|&lecture_id| LectureProgress {
                lecture_id,
                viewed: completed,
            })
            .collect();
        self.completed = completed;
        self.updated_at = Utc::now();
    }

    pub fn forget_lecture(&mut self, lecture_id: &LectureId) {
        self.lectures.retain(|l| &l.lecture_id != lecture_id);
    }
}
