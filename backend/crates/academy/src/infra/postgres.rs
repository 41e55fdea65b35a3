//! PostgreSQL Repository Implementations
//!
//! Lecture order and enrollment sets are derived columns (`ARRAY(...)`
//! subqueries), never stored on the course row.

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, LectureId, PurchaseId, UserId};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::entity::{
    course::Course,
    lecture::Lecture,
    member::Member,
    progress::{CourseProgress, LectureProgress},
    purchase::{CoursePurchase, PurchaseStatus, SettleOutcome},
};
use crate::domain::repository::{
    AccountRepository, CourseRepository, LectureRepository, MemberRepository, ProgressRepository,
    PurchaseRepository,
};
use crate::domain::value_object::{
    course_level::CourseLevel,
    media::ReleasedMedia,
    payment_reference::PaymentReference,
    search::{CourseSearch, PriceSort},
};
use crate::error::{AcademyError, AcademyResult};

/// PostgreSQL-backed academy repository
#[derive(Clone)]
pub struct PgAcademyRepository {
    pool: PgPool,
}

impl PgAcademyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COURSE_COLUMNS: &str = r#"
    c.course_id,
    c.creator_id,
    c.title,
    c.subtitle,
    c.description,
    c.category,
    c.level,
    c.price,
    c.thumbnail_url,
    c.is_published,
    ARRAY(
        SELECT l.lecture_id FROM lectures l
        WHERE l.course_id = c.course_id
        ORDER BY l.position, l.created_at
    ) AS lecture_ids,
    ARRAY(
        SELECT e.user_id FROM enrollments e
        WHERE e.course_id = c.course_id
        ORDER BY e.enrolled_at
    ) AS enrolled_student_ids,
    c.created_at,
    c.updated_at
"#;

const LECTURE_COLUMNS: &str = r#"
    lecture_id,
    course_id,
    title,
    video_url,
    video_media_id,
    is_preview_free,
    position,
    created_at,
    updated_at
"#;

const PURCHASE_COLUMNS: &str = r#"
    purchase_id,
    user_id,
    course_id,
    amount,
    currency,
    status,
    payment_reference,
    created_at,
    updated_at
"#;

/// Delete courses and everything hanging off them, returning their media
async fn delete_courses(conn: &mut PgConnection, course_ids: &[Uuid]) -> AcademyResult<ReleasedMedia> {
    let mut released = ReleasedMedia::default();
    if course_ids.is_empty() {
        return Ok(released);
    }

    let thumbnails: Vec<Option<String>> = sqlx::query_scalar(
        "SELECT thumbnail_url FROM courses WHERE course_id = ANY($1) ORDER BY created_at",
    )
    .bind(course_ids)
    .fetch_all(&mut *conn)
    .await?;
    for url in &thumbnails {
        released.push_image_url(url.as_deref());
    }

    let videos: Vec<Option<String>> = sqlx::query_scalar(
        "SELECT video_media_id FROM lectures WHERE course_id = ANY($1) ORDER BY course_id, position",
    )
    .bind(course_ids)
    .fetch_all(&mut *conn)
    .await?;
    for id in &videos {
        released.push_video_id(id.as_deref());
    }

    for sql in [
        "DELETE FROM lecture_progress WHERE course_id = ANY($1)",
        "DELETE FROM course_progress WHERE course_id = ANY($1)",
        "DELETE FROM enrollments WHERE course_id = ANY($1)",
        "DELETE FROM course_purchases WHERE course_id = ANY($1)",
        "DELETE FROM lectures WHERE course_id = ANY($1)",
        "DELETE FROM courses WHERE course_id = ANY($1)",
    ] {
        sqlx::query(sql).bind(course_ids).execute(&mut *conn).await?;
    }

    Ok(released)
}

// ============================================================================
// Course Repository Implementation
// ============================================================================

impl CourseRepository for PgAcademyRepository {
    async fn create_course(&self, course: &Course) -> AcademyResult<()> {
        sqlx::query(
            r#"
            INSERT INTO courses (
                course_id,
                creator_id,
                title,
                subtitle,
                description,
                category,
                level,
                price,
                thumbnail_url,
                is_published,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(course.course_id.as_uuid())
        .bind(course.creator_id.as_uuid())
        .bind(&course.title)
        .bind(&course.subtitle)
        .bind(&course.description)
        .bind(&course.category)
        .bind(course.level.map(|l| l.code()))
        .bind(course.price)
        .bind(&course.thumbnail_url)
        .bind(course.is_published)
        .bind(course.created_at)
        .bind(course.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_course(&self, course_id: &CourseId) -> AcademyResult<Option<Course>> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses c WHERE c.course_id = $1");
        let row = sqlx::query_as::<_, CourseRow>(&sql)
            .bind(course_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(CourseRow::into_course).transpose()
    }

    async fn list_courses_by_creator(&self, creator_id: &UserId) -> AcademyResult<Vec<Course>> {
        let sql = format!(
            "SELECT {COURSE_COLUMNS} FROM courses c WHERE c.creator_id = $1 ORDER BY c.created_at DESC"
        );
        let rows = sqlx::query_as::<_, CourseRow>(&sql)
            .bind(creator_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(CourseRow::into_course).collect()
    }

    async fn update_course(&self, course: &Course) -> AcademyResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE courses SET
                title = $2,
                subtitle = $3,
                description = $4,
                category = $5,
                level = $6,
                price = $7,
                thumbnail_url = $8,
                is_published = $9,
                updated_at = $10
            WHERE course_id = $1
            "#,
        )
        .bind(course.course_id.as_uuid())
        .bind(&course.title)
        .bind(&course.subtitle)
        .bind(&course.description)
        .bind(&course.category)
        .bind(course.level.map(|l| l.code()))
        .bind(course.price)
        .bind(&course.thumbnail_url)
        .bind(course.is_published)
        .bind(course.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AcademyError::CourseNotFound);
        }
        Ok(())
    }

    async fn delete_course(&self, course_id: &CourseId) -> AcademyResult<ReleasedMedia> {
        let mut tx = self.pool.begin().await?;
        let released = delete_courses(&mut tx, &[*course_id.as_uuid()]).await?;
        tx.commit().await?;

        Ok(released)
    }

    async fn search_published(&self, search: &CourseSearch) -> AcademyResult<Vec<Course>> {
        let sql = format!(
            r#"
            SELECT {COURSE_COLUMNS} FROM courses c
            WHERE c.is_published
              AND ($1 = '' OR c.title ILIKE $2 OR c.subtitle ILIKE $2 OR c.category ILIKE $2)
              AND (cardinality($3::text[]) = 0 OR lower(c.category) = ANY($3))
            ORDER BY
                CASE WHEN $4::text = 'low' THEN c.price END ASC,
                CASE WHEN $4::text = 'high' THEN c.price END DESC,
                c.created_at DESC
            "#
        );
        let sort = search.sort_by_price.map(|s| match s {
            PriceSort::Low => "low",
            PriceSort::High => "high",
        });

        let rows = sqlx::query_as::<_, CourseRow>(&sql)
            .bind(&search.query)
            .bind(search.like_pattern())
            .bind(&search.categories)
            .bind(sort)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(CourseRow::into_course).collect()
    }

    async fn latest_published(&self, limit: i64) -> AcademyResult<Vec<Course>> {
        let sql = format!(
            "SELECT {COURSE_COLUMNS} FROM courses c WHERE c.is_published ORDER BY c.created_at DESC LIMIT $1"
        );
        let rows = sqlx::query_as::<_, CourseRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(CourseRow::into_course).collect()
    }
}

// ============================================================================
// Lecture Repository Implementation
// ============================================================================

impl LectureRepository for PgAcademyRepository {
    async fn append_lecture(&self, lecture: &Lecture) -> AcademyResult<Lecture> {
        let position = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO lectures (
                lecture_id,
                course_id,
                title,
                video_url,
                video_media_id,
                is_preview_free,
                position,
                created_at,
                updated_at
            )
            SELECT $1, $2, $3, $4, $5, $6, COALESCE(MAX(position) + 1, 0), $7, $8
            FROM lectures WHERE course_id = $2
            RETURNING position
            "#,
        )
        .bind(lecture.lecture_id.as_uuid())
        .bind(lecture.course_id.as_uuid())
        .bind(&lecture.title)
        .bind(&lecture.video_url)
        .bind(&lecture.video_media_id)
        .bind(lecture.is_preview_free)
        .bind(lecture.created_at)
        .bind(lecture.updated_at)
        .fetch_one(&self.pool)
        .await?;

        let mut lecture = lecture.clone();
        lecture.position = position;
        Ok(lecture)
    }

    async fn find_lecture(&self, lecture_id: &LectureId) -> AcademyResult<Option<Lecture>> {
        let sql = format!("SELECT {LECTURE_COLUMNS} FROM lectures WHERE lecture_id = $1");
        let row = sqlx::query_as::<_, LectureRow>(&sql)
            .bind(lecture_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(LectureRow::into_lecture))
    }

    async fn list_lectures(&self, course_id: &CourseId) -> AcademyResult<Vec<Lecture>> {
        let sql = format!(
            "SELECT {LECTURE_COLUMNS} FROM lectures WHERE course_id = $1 ORDER BY position, created_at"
        );
        let rows = sqlx::query_as::<_, LectureRow>(&sql)
            .bind(course_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(LectureRow::into_lecture).collect())
    }

    async fn update_lecture(&self, lecture: &Lecture) -> AcademyResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE lectures SET
                title = $2,
                video_url = $3,
                video_media_id = $4,
                is_preview_free = $5,
                updated_at = $6
            WHERE lecture_id = $1
            "#,
        )
        .bind(lecture.lecture_id.as_uuid())
        .bind(&lecture.title)
        .bind(&lecture.video_url)
        .bind(&lecture.video_media_id)
        .bind(lecture.is_preview_free)
        .bind(lecture.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AcademyError::LectureNotFound);
        }
        Ok(())
    }

    async fn remove_lecture(&self, lecture_id: &LectureId) -> AcademyResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM lecture_progress WHERE lecture_id = $1")
            .bind(lecture_id.as_uuid())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM lectures WHERE lecture_id = $1")
            .bind(lecture_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

// ============================================================================
// Purchase Repository Implementation
// ============================================================================

impl PurchaseRepository for PgAcademyRepository {
    async fn find_completed_purchase(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> AcademyResult<Option<CoursePurchase>> {
        let sql = format!(
            "SELECT {PURCHASE_COLUMNS} FROM course_purchases WHERE user_id = $1 AND course_id = $2 AND status = $3"
        );
        let row = sqlx::query_as::<_, PurchaseRow>(&sql)
            .bind(user_id.as_uuid())
            .bind(course_id.as_uuid())
            .bind(PurchaseStatus::Completed.id())
            .fetch_optional(&self.pool)
            .await?;

        row.map(PurchaseRow::into_purchase).transpose()
    }

    async fn replace_pending_purchase(&self, purchase: &CoursePurchase) -> AcademyResult<u64> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(
            "DELETE FROM course_purchases WHERE user_id = $1 AND course_id = $2 AND status = $3",
        )
        .bind(purchase.user_id.as_uuid())
        .bind(purchase.course_id.as_uuid())
        .bind(PurchaseStatus::Pending.id())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let inserted = sqlx::query(
            r#"
            INSERT INTO course_purchases (
                purchase_id,
                user_id,
                course_id,
                amount,
                currency,
                status,
                payment_reference,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(purchase.purchase_id.as_uuid())
        .bind(purchase.user_id.as_uuid())
        .bind(purchase.course_id.as_uuid())
        .bind(purchase.amount)
        .bind(&purchase.currency)
        .bind(purchase.status.id())
        .bind(purchase.reference.as_str())
        .bind(purchase.created_at)
        .bind(purchase.updated_at)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            // A concurrent checkout for the same pair committed first
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(AcademyError::Validation(
                    "A checkout for this course is already in progress".into(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        Ok(removed)
    }

    async fn find_purchase_by_reference(
        &self,
        reference: &PaymentReference,
    ) -> AcademyResult<Option<CoursePurchase>> {
        let sql =
            format!("SELECT {PURCHASE_COLUMNS} FROM course_purchases WHERE payment_reference = $1");
        let row = sqlx::query_as::<_, PurchaseRow>(&sql)
            .bind(reference.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(PurchaseRow::into_purchase).transpose()
    }

    async fn settle_purchase(
        &self,
        reference: &PaymentReference,
        outcome: PurchaseStatus,
    ) -> AcademyResult<SettleOutcome> {
        let mut tx = self.pool.begin().await?;

        // Row lock: a concurrent settle of the same reference waits here.
        let sql = format!(
            "SELECT {PURCHASE_COLUMNS} FROM course_purchases WHERE payment_reference = $1 FOR UPDATE"
        );
        let row = sqlx::query_as::<_, PurchaseRow>(&sql)
            .bind(reference.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(SettleOutcome::NotPending);
        };
        let current = row.into_purchase()?;

        match current.status {
            PurchaseStatus::Pending => {}
            PurchaseStatus::Completed => {
                tx.rollback().await?;
                return Ok(SettleOutcome::AlreadyCompleted(current));
            }
            PurchaseStatus::Failed => {
                tx.rollback().await?;
                return Ok(SettleOutcome::NotPending);
            }
        }

        let mut paid_elsewhere = false;
        if outcome == PurchaseStatus::Completed {
            // Different references of one pair do not share a row lock.
            sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
                .bind(format!("purchase:{}:{}", current.user_id, current.course_id))
                .execute(&mut *tx)
                .await?;

            paid_elsewhere = sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM course_purchases
                    WHERE user_id = $1 AND course_id = $2 AND status = $3
                )
                "#,
            )
            .bind(current.user_id.as_uuid())
            .bind(current.course_id.as_uuid())
            .bind(PurchaseStatus::Completed.id())
            .fetch_one(&mut *tx)
            .await?;
        }
        let outcome = if paid_elsewhere {
            PurchaseStatus::Failed
        } else {
            outcome
        };

        let sql = format!(
            r#"
            UPDATE course_purchases SET status = $2, updated_at = now()
            WHERE purchase_id = $1
            RETURNING {PURCHASE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PurchaseRow>(&sql)
            .bind(current.purchase_id.as_uuid())
            .bind(outcome.id())
            .fetch_one(&mut *tx)
            .await?;
        let purchase = row.into_purchase()?;

        if paid_elsewhere {
            tx.commit().await?;
            return Ok(SettleOutcome::Duplicate(purchase));
        }

        if purchase.status == PurchaseStatus::Completed {
            sqlx::query(
                "UPDATE lectures SET is_preview_free = TRUE, updated_at = now() WHERE course_id = $1",
            )
            .bind(purchase.course_id.as_uuid())
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO enrollments (user_id, course_id, enrolled_at)
                VALUES ($1, $2, now())
                ON CONFLICT (user_id, course_id) DO NOTHING
                "#,
            )
            .bind(purchase.user_id.as_uuid())
            .bind(purchase.course_id.as_uuid())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(SettleOutcome::Settled(purchase))
    }

    async fn list_completed_purchases(
        &self,
        user_id: &UserId,
    ) -> AcademyResult<Vec<CoursePurchase>> {
        let sql = format!(
            "SELECT {PURCHASE_COLUMNS} FROM course_purchases WHERE user_id = $1 AND status = $2 ORDER BY updated_at DESC"
        );
        let rows = sqlx::query_as::<_, PurchaseRow>(&sql)
            .bind(user_id.as_uuid())
            .bind(PurchaseStatus::Completed.id())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PurchaseRow::into_purchase).collect()
    }
}

// ============================================================================
// Progress Repository Implementation
// ============================================================================

impl ProgressRepository for PgAcademyRepository {
    async fn find_progress(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> AcademyResult<Option<CourseProgress>> {
        let header = sqlx::query_as::<_, (bool, DateTime<Utc>)>(
            "SELECT completed, updated_at FROM course_progress WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id.as_uuid())
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some((completed, updated_at)) = header else {
            return Ok(None);
        };

        let lectures = sqlx::query_as::<_, (Uuid, bool)>(
            r#"
            SELECT lp.lecture_id, lp.viewed
            FROM lecture_progress lp
            JOIN lectures l ON l.lecture_id = lp.lecture_id
            WHERE lp.user_id = $1 AND lp.course_id = $2
            ORDER BY l.position
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(course_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(CourseProgress {
            user_id: *user_id,
            course_id: *course_id,
            lectures: lectures
                .into_iter()
                .map(|(id, viewed)| LectureProgress {
                    lecture_id: LectureId::from_uuid(id),
                    viewed,
                })
                .collect(),
            completed,
            updated_at,
        }))
    }

    /// Upserts per lecture, so concurrent views never drop each other's rows
    async fn save_progress(&self, progress: &CourseProgress) -> AcademyResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO course_progress (user_id, course_id, completed, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, course_id) DO UPDATE SET
                completed = EXCLUDED.completed,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(progress.user_id.as_uuid())
        .bind(progress.course_id.as_uuid())
        .bind(progress.completed)
        .bind(progress.updated_at)
        .execute(&mut *tx)
        .await?;

        let lecture_ids: Vec<Uuid> = progress
            .lectures
            .iter()
            .map(|l| *l.lecture_id.as_uuid())
            .collect();
        let viewed: Vec<bool> = progress.lectures.iter().map(|l| l.viewed).collect();

        sqlx::query(
            r#"
            INSERT INTO lecture_progress (user_id, course_id, lecture_id, viewed)
            SELECT $1, $2, t.lecture_id, t.viewed
            FROM UNNEST($3::uuid[], $4::bool[]) AS t(lecture_id, viewed)
            ON CONFLICT (user_id, course_id, lecture_id) DO UPDATE SET
                viewed = EXCLUDED.viewed
            "#,
        )
        .bind(progress.user_id.as_uuid())
        .bind(progress.course_id.as_uuid())
        .bind(&lecture_ids)
        .bind(&viewed)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

// ============================================================================
// Member & Account Repository Implementations
// ============================================================================

impl MemberRepository for PgAcademyRepository {
    async fn find_member(&self, user_id: &UserId) -> AcademyResult<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            "SELECT user_id, name, role, photo_url FROM users WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(MemberRow::into_member).transpose()
    }

    async fn find_members(&self, user_ids: &[UserId]) -> AcademyResult<Vec<Member>> {
        let ids: Vec<Uuid> = user_ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT user_id, name, role, photo_url FROM users WHERE user_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MemberRow::into_member).collect()
    }
}

impl AccountRepository for PgAcademyRepository {
    async fn purge_account(&self, user_id: &UserId) -> AcademyResult<ReleasedMedia> {
        let mut tx = self.pool.begin().await?;

        let owned: Vec<Uuid> =
            sqlx::query_scalar("SELECT course_id FROM courses WHERE creator_id = $1")
                .bind(user_id.as_uuid())
                .fetch_all(&mut *tx)
                .await?;
        let mut released = delete_courses(&mut tx, &owned).await?;

        let photo: Option<Option<String>> =
            sqlx::query_scalar("SELECT photo_url FROM users WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;

        for sql in [
            "DELETE FROM lecture_progress WHERE user_id = $1",
            "DELETE FROM course_progress WHERE user_id = $1",
            "DELETE FROM enrollments WHERE user_id = $1",
            "DELETE FROM course_purchases WHERE user_id = $1",
            "DELETE FROM auth_sessions WHERE user_id = $1",
            "DELETE FROM users WHERE user_id = $1",
        ] {
            sqlx::query(sql)
                .bind(user_id.as_uuid())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        released.push_image_url(photo.flatten().as_deref());
        Ok(released)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct CourseRow {
    course_id: Uuid,
    creator_id: Uuid,
    title: String,
    subtitle: Option<String>,
    description: Option<String>,
    category: String,
    level: Option<String>,
    price: i64,
    thumbnail_url: Option<String>,
    is_published: bool,
    lecture_ids: Vec<Uuid>,
    enrolled_student_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CourseRow {
    fn into_course(self) -> AcademyResult<Course> {
        let level = self
            .level
            .map(|code| {
                CourseLevel::from_code(&code)
                    .ok_or_else(|| AcademyError::Internal(format!("Invalid course level: {code}")))
            })
            .transpose()?;

        Ok(Course {
            course_id: CourseId::from_uuid(self.course_id),
            creator_id: UserId::from_uuid(self.creator_id),
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            category: self.category,
            level,
            price: self.price,
            thumbnail_url: self.thumbnail_url,
            is_published: self.is_published,
            lecture_ids: self.lecture_ids.into_iter().map(LectureId::from_uuid).collect(),
            enrolled_student_ids: self
                .enrolled_student_ids
                .into_iter()
                .map(UserId::from_uuid)
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LectureRow {
    lecture_id: Uuid,
    course_id: Uuid,
    title: String,
    video_url: Option<String>,
    video_media_id: Option<String>,
    is_preview_free: bool,
    position: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LectureRow {
    fn into_lecture(self) -> Lecture {
        Lecture {
            lecture_id: LectureId::from_uuid(self.lecture_id),
            course_id: CourseId::from_uuid(self.course_id),
            title: self.title,
            video_url: self.video_url,
            video_media_id: self.video_media_id,
            is_preview_free: self.is_preview_free,
            position: self.position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PurchaseRow {
    purchase_id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    amount: i64,
    currency: String,
    status: i16,
    payment_reference: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PurchaseRow {
    fn into_purchase(self) -> AcademyResult<CoursePurchase> {
        let status = PurchaseStatus::from_id(self.status).ok_or_else(|| {
            AcademyError::Internal(format!("Invalid purchase status id: {}", self.status))
        })?;

        Ok(CoursePurchase {
            purchase_id: PurchaseId::from_uuid(self.purchase_id),
            user_id: UserId::from_uuid(self.user_id),
            course_id: CourseId::from_uuid(self.course_id),
            amount: self.amount,
            currency: self.currency,
            status,
            reference: PaymentReference::from_db(self.payment_reference),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    user_id: Uuid,
    name: String,
    role: i16,
    photo_url: Option<String>,
}

impl MemberRow {
    fn into_member(self) -> AcademyResult<Member> {
        let role = auth::UserRole::from_id(self.role)
            .ok_or_else(|| AcademyError::Internal(format!("Invalid role id: {}", self.role)))?;

        Ok(Member {
            user_id: UserId::from_uuid(self.user_id),
            name: self.name,
            role,
            photo_url: self.photo_url,
        })
    }
}
