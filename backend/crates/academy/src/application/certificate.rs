//! Certificate Use Case

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{CourseId, UserId};

use crate::application::config::AcademyConfig;
use crate::application::course::load_course;
use crate::domain::entity::certificate::Certificate;
use crate::domain::repository::AcademyStore;
use crate::domain::services::CertificateRenderer;
use crate::error::{AcademyError, AcademyResult};

/// Rendered certificate ready to be sent as a download
#[derive(Debug, Clone)]
pub struct IssuedCertificate {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub struct CertificateUseCase<R>
where
    R: AcademyStore,
{
    store: Arc<R>,
    renderer: Arc<dyn CertificateRenderer>,
    config: Arc<AcademyConfig>,
}

impl<R> CertificateUseCase<R>
where
    R: AcademyStore,
{
    pub fn new(
        store: Arc<R>,
        renderer: Arc<dyn CertificateRenderer>,
        config: Arc<AcademyConfig>,
    ) -> Self {
        Self {
            store,
            renderer,
            config,
        }
    }

    pub async fn issue(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> AcademyResult<IssuedCertificate> {
        let course = load_course(self.store.as_ref(), course_id).await?;

        let completed = self
            .store
            .find_progress(user_id, course_id)
            .await?
            .is_some_and(|p| p.completed);
        if !completed {
            return Err(AcademyError::CourseNotCompleted);
        }

        let learner = self
            .store
            .find_member(user_id)
            .await?
            .ok_or(AcademyError::MemberNotFound)?;
        let instructor_name = self
            .store
            .find_member(&course.creator_id)
            .await?
            .map(|m| m.name)
            .unwrap_or_else(|| self.config.certificate_brand.clone());

        let certificate = Certificate {
            brand: self.config.certificate_brand.clone(),
            learner_name: learner.name,
            course_title: course.title,
            instructor_name,
            issued_on: Utc::now().date_naive(),
        };
        let file_name = certificate.file_name();

        let renderer = Arc::clone(&self.renderer);
        let bytes = tokio::task::spawn_blocking(move || renderer.render(&certificate)).await??;

        tracing::info!(
            user_id = %user_id,
            course_id = %course_id,
            size = bytes.len(),
            "Certificate issued"
        );

        Ok(IssuedCertificate {
            file_name,
            content_type: self.renderer.content_type(),
            bytes,
        })
    }
}
