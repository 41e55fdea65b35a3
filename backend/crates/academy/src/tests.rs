//! Use-case and HTTP flow tests against the in-memory repository

use auth::{CurrentUser, UserRole};
use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::entity::member::Member;

fn member(name: &str, role: UserRole) -> Member {
    Member {
        user_id: UserId::new(),
        name: name.to_string(),
        role,
        photo_url: Some(format!("https://cdn.example.com/avatars/{}.png", name.to_lowercase())),
    }
}

fn current(member: &Member) -> CurrentUser {
    CurrentUser {
        user_id: member.user_id,
        role: member.role,
        session_id: Uuid::new_v4(),
    }
}

#[cfg(test)]
mod use_case_tests {
    use std::sync::{Arc, Mutex};

    use auth::{CurrentUser, UserRole};
    use kernel::id::{CourseId, LectureId};

    use super::{current, member};
    use crate::application::{
        AccountCleanupUseCase, CertificateUseCase, CourseUseCase, LectureUseCase,
        ProgressUseCase, PurchaseUseCase,
    };
    use crate::domain::entity::{
        certificate::Certificate,
        course::{Course, CoursePatch},
        lecture::LecturePatch,
        purchase::{CoursePurchase, PurchaseStatus},
    };
    use crate::domain::repository::{
        CourseRepository, LectureRepository, ProgressRepository, PurchaseRepository,
    };
    use crate::domain::services::CertificateRenderer;
    use crate::domain::value_object::search::{CourseSearch, PriceSort};
    use crate::{AcademyConfig, AcademyError, AcademyResult, InMemoryAcademyRepository, PrintPdfRenderer};

    struct Harness {
        store: Arc<InMemoryAcademyRepository>,
        config: Arc<AcademyConfig>,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_config(AcademyConfig::development())
        }

        fn with_config(config: AcademyConfig) -> Self {
            Self {
                store: Arc::new(InMemoryAcademyRepository::new()),
                config: Arc::new(config),
            }
        }

        async fn user(&self, name: &str, role: UserRole) -> CurrentUser {
            let m = member(name, role);
            let user = current(&m);
            self.store.seed_member(m).await;
            user
        }

        fn courses(&self) -> CourseUseCase<InMemoryAcademyRepository> {
            CourseUseCase::new(self.store.clone(), self.config.clone())
        }

        fn lectures(&self) -> LectureUseCase<InMemoryAcademyRepository> {
            LectureUseCase::new(self.store.clone())
        }

        fn purchases(&self) -> PurchaseUseCase<InMemoryAcademyRepository> {
            PurchaseUseCase::new(self.store.clone(), self.config.clone())
        }

        fn progress(&self) -> ProgressUseCase<InMemoryAcademyRepository> {
            ProgressUseCase::new(self.store.clone())
        }

        /// Published course with `lectures` lectures, each with a video
        async fn course(
            &self,
            owner: &CurrentUser,
            title: &str,
            price: i64,
            lectures: usize,
        ) -> (Course, Vec<LectureId>) {
            let course = self.courses().create(owner, title, "Programming").await.unwrap();
            self.courses()
                .edit(
                    owner,
                    &course.course_id,
                    CoursePatch {
                        price: Some(price),
                        thumbnail_url: Some(format!(
                            "https://cdn.example.com/thumbs/{}.png",
                            course.course_id
                        )),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            let mut ids = Vec::new();
            for i in 0..lectures {
                let lecture = self
                    .lectures()
                    .create(owner, &course.course_id, &format!("Lecture {i}"))
                    .await
                    .unwrap();
                self.lectures()
                    .edit(
                        owner,
                        &course.course_id,
                        &lecture.lecture_id,
                        LecturePatch {
                            video_url: Some(format!("https://cdn.example.com/v/{i}.mp4")),
                            video_media_id: Some(format!("video-{i}")),
                            ..Default::default()
                        },
                    )
                    .await
                    .unwrap();
                ids.push(lecture.lecture_id);
            }

            let course = self
                .courses()
                .set_published(owner, &course.course_id, true)
                .await
                .unwrap();
            (course, ids)
        }

        async fn enroll(&self, buyer: &CurrentUser, course_id: &CourseId) {
            let order = self.purchases().checkout(buyer, course_id).await.unwrap();
            self.purchases()
                .confirm(order.reference.as_str(), PurchaseStatus::Completed)
                .await
                .unwrap();
        }
    }

    #[derive(Default)]
    struct CapturingRenderer {
        seen: Mutex<Vec<Certificate>>,
    }

    impl CertificateRenderer for CapturingRenderer {
        fn render(&self, certificate: &Certificate) -> AcademyResult<Vec<u8>> {
            self.seen.lock().unwrap().push(certificate.clone());
            Ok(format!(
                "{}|{}|{}",
                certificate.learner_name, certificate.course_title, certificate.instructor_name
            )
            .into_bytes())
        }
    }

    // ------------------------------------------------------------------------
    // Authoring
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_only_instructors_create_courses() {
        let h = Harness::new();
        let student = h.user("Sam", UserRole::Student).await;

        assert!(matches!(
            h.courses().create(&student, "Rust", "Programming").await,
            Err(AcademyError::InstructorOnly)
        ));
    }

    #[tokio::test]
    async fn test_only_creator_mutates() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let other = h.user("Linus", UserRole::Instructor).await;
        let (course, lectures) = h.course(&owner, "Rust", 100, 1).await;

        assert!(matches!(
            h.courses()
                .edit(&other, &course.course_id, CoursePatch::default())
                .await,
            Err(AcademyError::NotCourseOwner)
        ));
        assert!(matches!(
            h.courses().set_published(&other, &course.course_id, false).await,
            Err(AcademyError::NotCourseOwner)
        ));
        assert!(matches!(
            h.lectures().create(&other, &course.course_id, "Hijack").await,
            Err(AcademyError::NotCourseOwner)
        ));
        assert!(matches!(
            h.lectures().remove(&other, &lectures[0]).await,
            Err(AcademyError::NotCourseOwner)
        ));
        assert!(matches!(
            h.courses().delete(&other, &course.course_id).await,
            Err(AcademyError::NotCourseOwner)
        ));
    }

    #[tokio::test]
    async fn test_lectures_keep_creation_order() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let (course, ids) = h.course(&owner, "Rust", 0, 3).await;

        assert_eq!(course.lecture_ids, ids);
        let listed = h.lectures().list(&course.course_id).await.unwrap();
        let positions: Vec<i32> = listed.iter().map(|l| l.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);

        let detail = h.courses().get(&course.course_id).await.unwrap();
        assert_eq!(detail.creator.unwrap().name, "Grace");
        assert_eq!(detail.lectures.len(), 3);
    }

    #[tokio::test]
    async fn test_edit_lecture_must_belong_to_course() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let (first, _) = h.course(&owner, "Rust", 0, 1).await;
        let (_, other_lectures) = h.course(&owner, "Go", 0, 1).await;

        assert!(matches!(
            h.lectures()
                .edit(
                    &owner,
                    &first.course_id,
                    &other_lectures[0],
                    LecturePatch::default()
                )
                .await,
            Err(AcademyError::LectureNotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_course_cascades() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let student = h.user("Sam", UserRole::Student).await;
        let (course, lectures) = h.course(&owner, "Rust", 500, 2).await;

        h.enroll(&student, &course.course_id).await;
        h.progress()
            .view_lecture(&student.user_id, &course.course_id, &lectures[0])
            .await
            .unwrap();

        let released = h.courses().delete(&owner, &course.course_id).await.unwrap();
        assert_eq!(released.images, vec![course.course_id.to_string()]);
        assert_eq!(released.videos, vec!["video-0", "video-1"]);

        assert!(h.store.find_course(&course.course_id).await.unwrap().is_none());
        assert!(h.store.find_lecture(&lectures[0]).await.unwrap().is_none());
        assert_eq!(h.store.enrollment_count(&course.course_id).await, 0);
        assert_eq!(h.store.purchase_count(&student.user_id, &course.course_id).await, 0);
        assert!(h
            .store
            .find_progress(&student.user_id, &course.course_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_remove_lecture_releases_video() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let student = h.user("Sam", UserRole::Student).await;
        let (course, lectures) = h.course(&owner, "Rust", 0, 2).await;

        h.progress()
            .view_lecture(&student.user_id, &course.course_id, &lectures[1])
            .await
            .unwrap();

        let released = h.lectures().remove(&owner, &lectures[1]).await.unwrap();
        assert_eq!(released.videos, vec!["video-1"]);

        let progress = h
            .store
            .find_progress(&student.user_id, &course.course_id)
            .await
            .unwrap()
            .unwrap();
        assert!(progress.lectures.is_empty());

        let course = h.store.find_course(&course.course_id).await.unwrap().unwrap();
        assert_eq!(course.lecture_ids, vec![lectures[0]]);
    }

    // ------------------------------------------------------------------------
    // Catalogue
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_search_filters_and_sorts() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        h.course(&owner, "Rust Basics", 300, 0).await;
        h.course(&owner, "Advanced Rust", 900, 0).await;
        h.course(&owner, "Python Intro", 100, 0).await;
        let draft = h.courses().create(&owner, "Rust Draft", "Programming").await.unwrap();

        let found = h
            .courses()
            .search(&CourseSearch::new(Some("rust"), None, Some(PriceSort::High)))
            .await
            .unwrap();
        let titles: Vec<&str> = found.iter().map(|c| c.course.title.as_str()).collect();
        assert_eq!(titles, vec!["Advanced Rust", "Rust Basics"]);
        assert!(found.iter().all(|c| c.course.course_id != draft.course_id));
        assert_eq!(found[0].creator.as_ref().unwrap().name, "Grace");

        let cheapest = h
            .courses()
            .search(&CourseSearch::new(None, Some("programming"), Some(PriceSort::Low)))
            .await
            .unwrap();
        assert_eq!(cheapest[0].course.title, "Python Intro");

        let none = h
            .courses()
            .search(&CourseSearch::new(None, Some("cooking"), None))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_suggestions_are_limited() {
        let h = Harness::with_config(AcademyConfig {
            suggestion_limit: 2,
            ..AcademyConfig::development()
        });
        let owner = h.user("Grace", UserRole::Instructor).await;
        for title in ["A", "B", "C"] {
            h.course(&owner, title, 0, 0).await;
        }

        assert_eq!(h.courses().suggestions().await.unwrap().len(), 2);
        assert_eq!(h.courses().published().await.unwrap().len(), 3);
    }

    // ------------------------------------------------------------------------
    // Purchases
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_checkout_own_course_rejected() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let (course, _) = h.course(&owner, "Rust", 500, 1).await;

        assert!(matches!(
            h.purchases().checkout(&owner, &course.course_id).await,
            Err(AcademyError::OwnCourse)
        ));
        assert!(matches!(
            h.purchases().checkout(&owner, &CourseId::new()).await,
            Err(AcademyError::CourseNotFound)
        ));
    }

    #[tokio::test]
    async fn test_second_checkout_invalidates_first() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let student = h.user("Sam", UserRole::Student).await;
        let (course, _) = h.course(&owner, "Rust", 49_900, 1).await;

        let first = h.purchases().checkout(&student, &course.course_id).await.unwrap();
        assert_eq!(first.amount, 49_900);
        assert_eq!(first.currency, "INR");
        assert_eq!(first.course_title, "Rust");

        let second = h.purchases().checkout(&student, &course.course_id).await.unwrap();
        assert_ne!(first.reference, second.reference);
        assert_eq!(h.store.purchase_count(&student.user_id, &course.course_id).await, 1);

        assert!(matches!(
            h.purchases().status(first.reference.as_str()).await,
            Err(AcademyError::PurchaseNotFound)
        ));
        assert!(matches!(
            h.purchases()
                .confirm(first.reference.as_str(), PurchaseStatus::Completed)
                .await,
            Err(AcademyError::PurchaseNotFound)
        ));

        let pending = h.purchases().status(second.reference.as_str()).await.unwrap();
        assert_eq!(pending.status, PurchaseStatus::Pending);
    }

    #[tokio::test]
    async fn test_double_confirm_does_not_double_enroll() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let student = h.user("Sam", UserRole::Student).await;
        let (course, _) = h.course(&owner, "Rust", 500, 2).await;

        let order = h.purchases().checkout(&student, &course.course_id).await.unwrap();

        let first = h
            .purchases()
            .confirm(order.reference.as_str(), PurchaseStatus::Completed)
            .await
            .unwrap();
        assert!(!first.replayed);
        assert_eq!(first.purchase.status, PurchaseStatus::Completed);

        let second = h
            .purchases()
            .confirm(order.reference.as_str(), PurchaseStatus::Completed)
            .await
            .unwrap();
        assert!(second.replayed);

        assert_eq!(h.store.enrollment_count(&course.course_id).await, 1);
        let course_now = h.store.find_course(&course.course_id).await.unwrap().unwrap();
        assert_eq!(course_now.enrolled_student_ids, vec![student.user_id]);

        let lectures = h.store.list_lectures(&course.course_id).await.unwrap();
        assert!(lectures.iter().all(|l| l.is_preview_free));

        assert!(matches!(
            h.purchases().checkout(&student, &course.course_id).await,
            Err(AcademyError::AlreadyPurchased)
        ));

        let (_, purchased) = h
            .purchases()
            .detail_with_status(&student.user_id, &course.course_id)
            .await
            .unwrap();
        assert!(purchased);
        let list = h.purchases().list_purchased(&student.user_id).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].course.title, "Rust");
    }

    #[tokio::test]
    async fn test_confirming_a_racing_checkout_after_completion_fails_it() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let student = h.user("Sam", UserRole::Student).await;
        let (course, _) = h.course(&owner, "Rust", 500, 1).await;

        let first = h.purchases().checkout(&student, &course.course_id).await.unwrap();
        let settled = h
            .purchases()
            .confirm(first.reference.as_str(), PurchaseStatus::Completed)
            .await
            .unwrap();
        assert!(!settled.duplicate);

        // A second checkout that passed its ownership check before the first settled
        let racing = CoursePurchase::pending(student.user_id, course.course_id, 500, "INR");
        h.store.replace_pending_purchase(&racing).await.unwrap();

        let outcome = h
            .purchases()
            .confirm(racing.reference.as_str(), PurchaseStatus::Completed)
            .await
            .unwrap();
        assert!(outcome.duplicate);
        assert!(!outcome.replayed);
        assert_eq!(outcome.purchase.status, PurchaseStatus::Failed);

        let completed = h.store.list_completed_purchases(&student.user_id).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].reference, first.reference);
        assert_eq!(h.store.enrollment_count(&course.course_id).await, 1);

        // Settled for good: a gateway retry finds nothing pending.
        assert!(matches!(
            h.purchases()
                .confirm(racing.reference.as_str(), PurchaseStatus::Completed)
                .await,
            Err(AcademyError::PurchaseNotFound)
        ));
    }

    #[tokio::test]
    async fn test_failed_payment_is_terminal() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let student = h.user("Sam", UserRole::Student).await;
        let (course, _) = h.course(&owner, "Rust", 500, 1).await;

        let order = h.purchases().checkout(&student, &course.course_id).await.unwrap();
        let failed = h
            .purchases()
            .confirm(order.reference.as_str(), PurchaseStatus::Failed)
            .await
            .unwrap();
        assert_eq!(failed.purchase.status, PurchaseStatus::Failed);
        assert_eq!(h.store.enrollment_count(&course.course_id).await, 0);

        assert!(matches!(
            h.purchases()
                .confirm(order.reference.as_str(), PurchaseStatus::Completed)
                .await,
            Err(AcademyError::PurchaseNotFound)
        ));

        let status = h.purchases().status(order.reference.as_str()).await.unwrap();
        assert_eq!(status.status, PurchaseStatus::Failed);

        // A fresh attempt is allowed after a failure
        assert!(h.purchases().checkout(&student, &course.course_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_reference() {
        let h = Harness::new();

        assert!(matches!(
            h.purchases().confirm("not-a-reference", PurchaseStatus::Completed).await,
            Err(AcademyError::PurchaseNotFound)
        ));
        assert!(matches!(
            h.purchases().status("TXN_0123456789abcdef01234567").await,
            Err(AcademyError::PurchaseNotFound)
        ));
        assert!(matches!(
            h.purchases()
                .confirm("TXN_0123456789abcdef01234567", PurchaseStatus::Pending)
                .await,
            Err(AcademyError::Validation(_))
        ));
    }

    #[test]
    fn test_webhook_signature() {
        let secret = platform::crypto::random_secret();
        let h = Harness::with_config(AcademyConfig {
            webhook_secret: Some(secret),
            ..AcademyConfig::development()
        });
        let body = br#"{"transactionId":"TXN_0123456789abcdef01234567"}"#;
        let good = platform::crypto::to_base64(&platform::crypto::hmac_sha256(&secret, body));

        assert!(h.purchases().verify_webhook(body, Some(good.as_str())).is_ok());
        assert!(matches!(
            h.purchases().verify_webhook(b"{}", Some(good.as_str())),
            Err(AcademyError::InvalidWebhookSignature)
        ));
        assert!(matches!(
            h.purchases().verify_webhook(body, Some("%%%")),
            Err(AcademyError::InvalidWebhookSignature)
        ));
        assert!(matches!(
            h.purchases().verify_webhook(body, None),
            Err(AcademyError::InvalidWebhookSignature)
        ));

        let open = Harness::new();
        assert!(open.purchases().verify_webhook(body, None).is_ok());
    }

    // ------------------------------------------------------------------------
    // Progress
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_viewing_every_lecture_in_any_order_completes() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let student = h.user("Sam", UserRole::Student).await;
        let (course, lectures) = h.course(&owner, "Rust", 0, 3).await;

        for id in [lectures[2], lectures[0]] {
            let progress = h
                .progress()
                .view_lecture(&student.user_id, &course.course_id, &id)
                .await
                .unwrap();
            assert!(!progress.completed);
        }

        // Re-viewing is idempotent and does not complete a strict subset
        let progress = h
            .progress()
            .view_lecture(&student.user_id, &course.course_id, &lectures[0])
            .await
            .unwrap();
        assert!(!progress.completed);
        assert_eq!(progress.lectures.len(), 2);

        let progress = h
            .progress()
            .view_lecture(&student.user_id, &course.course_id, &lectures[1])
            .await
            .unwrap();
        assert!(progress.completed);

        let view = h
            .progress()
            .fetch(&student.user_id, &course.course_id)
            .await
            .unwrap();
        assert!(view.completed);
        assert_eq!(view.lectures.len(), 3);
        assert!(view.lectures.iter().all(|l| l.viewed));
    }

    #[tokio::test]
    async fn test_view_rejects_foreign_lecture() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let student = h.user("Sam", UserRole::Student).await;
        let (course, _) = h.course(&owner, "Rust", 0, 1).await;
        let (_, foreign) = h.course(&owner, "Go", 0, 1).await;

        assert!(matches!(
            h.progress()
                .view_lecture(&student.user_id, &course.course_id, &foreign[0])
                .await,
            Err(AcademyError::LectureNotFound)
        ));
        assert!(matches!(
            h.progress()
                .view_lecture(&student.user_id, &CourseId::new(), &foreign[0])
                .await,
            Err(AcademyError::CourseNotFound)
        ));
    }

    #[tokio::test]
    async fn test_unstarted_progress_shape() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let student = h.user("Sam", UserRole::Student).await;
        let (course, _) = h.course(&owner, "Rust", 0, 2).await;

        let view = h
            .progress()
            .fetch(&student.user_id, &course.course_id)
            .await
            .unwrap();
        assert!(view.lectures.is_empty());
        assert!(!view.completed);
        assert_eq!(view.course.lectures.len(), 2);

        assert!(matches!(
            h.progress().fetch(&student.user_id, &CourseId::new()).await,
            Err(AcademyError::CourseNotFound)
        ));
    }

    #[tokio::test]
    async fn test_force_incomplete_resets_every_flag() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let student = h.user("Sam", UserRole::Student).await;
        let (course, lectures) = h.course(&owner, "Rust", 0, 3).await;

        h.progress()
            .view_lecture(&student.user_id, &course.course_id, &lectures[0])
            .await
            .unwrap();

        let done = h
            .progress()
            .set_completion(&student.user_id, &course.course_id, true)
            .await
            .unwrap();
        assert!(done.completed);

        h.progress()
            .set_completion(&student.user_id, &course.course_id, false)
            .await
            .unwrap();

        let view = h
            .progress()
            .fetch(&student.user_id, &course.course_id)
            .await
            .unwrap();
        assert!(!view.completed);
        assert_eq!(view.lectures.len(), 3);
        assert!(view.lectures.iter().all(|l| !l.viewed));
    }

    // ------------------------------------------------------------------------
    // Certificates
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_certificate_requires_completion() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let student = h.user("Sam", UserRole::Student).await;
        let title = "Rust: Ownership & Borrowing, Part 1";
        let (course, _) = h.course(&owner, title, 0, 2).await;

        let renderer = Arc::new(CapturingRenderer::default());
        let certificates =
            CertificateUseCase::new(h.store.clone(), renderer.clone(), h.config.clone());

        assert!(matches!(
            certificates.issue(&student.user_id, &course.course_id).await,
            Err(AcademyError::CourseNotCompleted)
        ));
        assert!(renderer.seen.lock().unwrap().is_empty());

        h.progress()
            .set_completion(&student.user_id, &course.course_id, true)
            .await
            .unwrap();

        let issued = certificates
            .issue(&student.user_id, &course.course_id)
            .await
            .unwrap();
        assert_eq!(issued.content_type, "application/pdf");
        assert_eq!(
            issued.file_name,
            "certificate-rust-ownership-borrowing-part-1.pdf"
        );
        let text = String::from_utf8(issued.bytes).unwrap();
        assert!(text.contains("Sam"));
        assert!(text.contains(title));

        let seen = renderer.seen.lock().unwrap();
        assert_eq!(seen[0].learner_name, "Sam");
        assert_eq!(seen[0].course_title, title);
        assert_eq!(seen[0].instructor_name, "Grace");
        assert_eq!(seen[0].brand, "LMS Academy");
    }

    #[tokio::test]
    async fn test_certificate_renders_pdf() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let student = h.user("Sam", UserRole::Student).await;
        let (course, _) = h.course(&owner, "Rust", 0, 1).await;

        h.progress()
            .set_completion(&student.user_id, &course.course_id, true)
            .await
            .unwrap();

        let issued = CertificateUseCase::new(
            h.store.clone(),
            Arc::new(PrintPdfRenderer::new().unwrap()),
            h.config.clone(),
        )
        .issue(&student.user_id, &course.course_id)
        .await
        .unwrap();
        assert!(issued.bytes.starts_with(b"%PDF"));
    }

    // ------------------------------------------------------------------------
    // Account cleanup
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_account_purge_is_idempotent() {
        let h = Harness::new();
        let owner = h.user("Grace", UserRole::Instructor).await;
        let student = h.user("Sam", UserRole::Student).await;
        let (course, lectures) = h.course(&owner, "Rust", 500, 1).await;

        h.enroll(&student, &course.course_id).await;
        h.progress()
            .view_lecture(&student.user_id, &course.course_id, &lectures[0])
            .await
            .unwrap();

        let cleanup = AccountCleanupUseCase::new(h.store.clone());
        let released = cleanup.delete_account(&owner.user_id).await.unwrap();
        assert_eq!(
            released.images,
            vec![course.course_id.to_string(), "grace".to_string()]
        );
        assert_eq!(released.videos, vec!["video-0"]);

        assert!(h.store.find_course(&course.course_id).await.unwrap().is_none());
        assert!(h
            .store
            .find_progress(&student.user_id, &course.course_id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(h.store.purchase_count(&student.user_id, &course.course_id).await, 0);

        let again = cleanup.delete_account(&owner.user_id).await.unwrap();
        assert!(again.is_empty());

        // The student keeps their account
        let student_released = cleanup.delete_account(&student.user_id).await.unwrap();
        assert_eq!(student_released.images, vec!["sam"]);
        assert!(student_released.videos.is_empty());
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use auth::application::{ProfileUseCase, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase};
    use auth::{AuthConfig, AuthMiddlewareState, InMemoryAuthRepository};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::domain::entity::member::Member;
    use crate::presentation::handlers::WEBHOOK_SIGNATURE_HEADER;
    use crate::{
        AcademyAppState, AcademyConfig, InMemoryAcademyRepository, PrintPdfRenderer,
        account_router, course_router, progress_router, purchase_router,
    };

    const UA: &str = "AcademyRouterTest/1.0";
    const PASSWORD: &str = "correct-horse-battery";

    struct App {
        router: Router,
        instructor: String,
        student: String,
    }

    fn fingerprint() -> platform::client::ClientFingerprint {
        platform::client::ClientFingerprint {
            hash: platform::crypto::sha256(UA.as_bytes()),
            ip: None,
            user_agent: Some(UA.to_string()),
        }
    }

    /// Register, optionally promote, mirror into the academy store, sign in
    async fn sign_in(
        auth_repo: &Arc<InMemoryAuthRepository>,
        auth_config: &Arc<AuthConfig>,
        store: &InMemoryAcademyRepository,
        name: &str,
        email: &str,
        instructor: bool,
    ) -> String {
        let mut user = SignUpUseCase::new(auth_repo.clone(), auth_config.clone())
            .execute(SignUpInput {
                name: name.into(),
                email: email.into(),
                password: PASSWORD.into(),
            })
            .await
            .unwrap();
        if instructor {
            user = ProfileUseCase::new(auth_repo.clone(), auth_repo.clone())
                .become_instructor(&user.user_id)
                .await
                .unwrap();
        }

        store
            .seed_member(Member {
                user_id: user.user_id,
                name: user.name.as_str().to_string(),
                role: user.role,
                photo_url: None,
            })
            .await;

        let output = SignInUseCase::new(auth_repo.clone(), auth_repo.clone(), auth_config.clone())
            .execute(
                SignInInput {
                    email: email.into(),
                    password: PASSWORD.into(),
                },
                fingerprint(),
            )
            .await
            .unwrap();
        format!("token={}", output.session_token)
    }

    async fn app(config: AcademyConfig) -> App {
        let auth_repo = Arc::new(InMemoryAuthRepository::new());
        let auth_config = Arc::new(AuthConfig::development());
        let store = InMemoryAcademyRepository::new();

        let instructor = sign_in(
            &auth_repo,
            &auth_config,
            &store,
            "Grace Hopper",
            "grace@example.com",
            true,
        )
        .await;
        let student = sign_in(
            &auth_repo,
            &auth_config,
            &store,
            "Ada Lovelace",
            "ada@example.com",
            false,
        )
        .await;

        let store = Arc::new(store);
        let guard = AuthMiddlewareState::new(auth_repo, auth_config);
        let state = AcademyAppState::new(store.clone(), config, PrintPdfRenderer::new().unwrap());

        let router = Router::new()
            .nest("/course", course_router(state.clone(), guard.clone()))
            .nest("/purchase", purchase_router(state.clone(), guard.clone()))
            .nest("/progress", progress_router(state, guard.clone()))
            .nest("/user", account_router(store, guard));

        App {
            router,
            instructor,
            student,
        }
    }

    fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::USER_AGENT, UA);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn call(
        app: &App,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let response = app
            .router
            .clone()
            .oneshot(request(method, uri, cookie, body))
            .await
            .unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Published course with one lecture, created over HTTP
    async fn published_course(app: &App) -> (String, String) {
        let (status, body) = call(
            app,
            "POST",
            "/course",
            Some(&app.instructor),
            Some(serde_json::json!({ "courseTitle": "Compilers", "category": "Programming" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let course_id = body["course"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            app,
            "PUT",
            &format!("/course/{course_id}"),
            Some(&app.instructor),
            Some(serde_json::json!({ "coursePrice": 1999, "courseLevel": "Advance" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["course"]["coursePrice"], 1999);

        let (status, body) = call(
            app,
            "POST",
            &format!("/course/{course_id}/lecture"),
            Some(&app.instructor),
            Some(serde_json::json!({ "lectureTitle": "Parsing" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let lecture_id = body["lecture"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            app,
            "PATCH",
            &format!("/course/{course_id}?publish=true"),
            Some(&app.instructor),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["course"]["isPublished"], true);

        (course_id, lecture_id)
    }

    #[tokio::test]
    async fn test_catalogue_is_public_authoring_is_not() {
        let app = app(AcademyConfig::development()).await;
        published_course(&app).await;

        let (status, body) = call(&app, "GET", "/course/published-courses", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["courses"][0]["courseTitle"], "Compilers");
        assert_eq!(body["courses"][0]["creator"]["name"], "Grace Hopper");

        let (status, body) = call(
            &app,
            "GET",
            "/course/search?query=compil&sortByPrice=low",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["courses"].as_array().unwrap().len(), 1);

        let (status, _) = call(&app, "GET", "/course", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = call(
            &app,
            "POST",
            "/course",
            Some(&app.student),
            Some(serde_json::json!({ "courseTitle": "Nope", "category": "X" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_purchase_flow() {
        let app = app(AcademyConfig::development()).await;
        let (course_id, _) = published_course(&app).await;

        let (status, body) = call(
            &app,
            "POST",
            "/purchase/checkout",
            Some(&app.instructor),
            Some(serde_json::json!({ "courseId": course_id })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "You cannot purchase your own course");

        let (status, body) = call(
            &app,
            "POST",
            "/purchase/checkout",
            Some(&app.student),
            Some(serde_json::json!({ "courseId": course_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["order"]["amount"], 1999);
        assert_eq!(body["order"]["currency"], "INR");
        let reference = body["order"]["transactionId"].as_str().unwrap().to_string();

        let (_, body) = call(
            &app,
            "GET",
            &format!("/purchase/status/{reference}"),
            Some(&app.student),
            None,
        )
        .await;
        assert_eq!(body["status"], "pending");

        let webhook = serde_json::json!({ "transactionId": reference });
        let (status, body) = call(&app, "POST", "/purchase/webhook", None, Some(webhook.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Payment verified");
        assert_eq!(body["status"], "completed");

        let (status, body) = call(&app, "POST", "/purchase/webhook", None, Some(webhook)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Payment already verified");

        let (_, body) = call(
            &app,
            "GET",
            &format!("/purchase/course/{course_id}/detail-with-status"),
            Some(&app.student),
            None,
        )
        .await;
        assert_eq!(body["purchased"], true);
        assert_eq!(body["lectureDetails"][0]["isPreviewFree"], true);
        assert_eq!(body["course"]["enrolledStudents"].as_array().unwrap().len(), 1);

        let (_, body) = call(&app, "GET", "/purchase", Some(&app.student), None).await;
        assert_eq!(body["purchasedCourses"][0]["transactionId"], reference.as_str());

        let (status, _) = call(
            &app,
            "GET",
            "/purchase/status/TXN_0123456789abcdef01234567",
            Some(&app.student),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_signed_webhook() {
        let secret = platform::crypto::random_secret();
        let app = app(AcademyConfig {
            webhook_secret: Some(secret),
            ..AcademyConfig::development()
        })
        .await;
        let (course_id, _) = published_course(&app).await;

        let (_, body) = call(
            &app,
            "POST",
            "/purchase/checkout",
            Some(&app.student),
            Some(serde_json::json!({ "courseId": course_id })),
        )
        .await;
        let reference = body["order"]["transactionId"].as_str().unwrap().to_string();
        let payload = serde_json::json!({ "transactionId": reference, "status": "completed" }).to_string();

        let unsigned = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/purchase/webhook")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(unsigned.status(), StatusCode::UNAUTHORIZED);

        let signature = platform::crypto::to_base64(&platform::crypto::hmac_sha256(
            &secret,
            payload.as_bytes(),
        ));
        let signed = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/purchase/webhook")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(WEBHOOK_SIGNATURE_HEADER, signature)
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(signed.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_progress_and_certificate_download() {
        let app = app(AcademyConfig::development()).await;
        let (course_id, lecture_id) = published_course(&app).await;

        let (status, body) = call(
            &app,
            "GET",
            &format!("/progress/{course_id}"),
            Some(&app.student),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["completed"], false);
        assert_eq!(body["data"]["progress"], serde_json::json!([]));

        let (status, body) = call(
            &app,
            "GET",
            &format!("/progress/{course_id}/certificate"),
            Some(&app.student),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Course not completed yet");

        let (status, _) = call(
            &app,
            "POST",
            &format!("/progress/{course_id}/lecture/{lecture_id}/view"),
            Some(&app.student),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = call(
            &app,
            "GET",
            &format!("/progress/{course_id}"),
            Some(&app.student),
            None,
        )
        .await;
        assert_eq!(body["data"]["completed"], true);
        assert_eq!(body["data"]["progress"][0]["viewed"], true);

        let response = app
            .router
            .clone()
            .oneshot(request(
                "GET",
                &format!("/progress/{course_id}/certificate"),
                Some(&app.student),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"certificate-compilers.pdf\""
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_delete_account_clears_cookie() {
        let app = app(AcademyConfig::development()).await;
        let (course_id, _) = published_course(&app).await;

        let response = app
            .router
            .clone()
            .oneshot(request("DELETE", "/user/profile/delete", Some(&app.instructor), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cleared = response.headers().get(header::SET_COOKIE).unwrap();
        assert!(cleared.to_str().unwrap().contains("Max-Age=0"));

        let (status, _) = call(
            &app,
            "GET",
            &format!("/course/{course_id}"),
            Some(&app.student),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
