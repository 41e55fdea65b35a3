//! Academy Error Types
//!
//! Integrates with the unified `kernel::error::AppError` system the same
//! way `auth::AuthError` does.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type AcademyResult<T> = Result<T, AcademyError>;

#[derive(Debug, Error)]
pub enum AcademyError {
    #[error("Course not found")]
    CourseNotFound,

    #[error("Lecture not found")]
    LectureNotFound,

    #[error("Payment not found")]
    PurchaseNotFound,

    #[error("User not found")]
    MemberNotFound,

    #[error("Only the course creator can do this")]
    NotCourseOwner,

    #[error("Only instructors can create courses")]
    InstructorOnly,

    #[error("You cannot purchase your own course")]
    OwnCourse,

    #[error("You have already purchased this course")]
    AlreadyPurchased,

    #[error("Course not completed yet")]
    CourseNotCompleted,

    #[error("Invalid webhook signature")]
    InvalidWebhookSignature,

    #[error("{0}")]
    Validation(String),

    #[error("Certificate rendering failed: {0}")]
    Render(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AcademyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AcademyError::CourseNotFound
            | AcademyError::LectureNotFound
            | AcademyError::PurchaseNotFound
            | AcademyError::MemberNotFound => ErrorKind::NotFound,
            AcademyError::NotCourseOwner | AcademyError::InstructorOnly => ErrorKind::Forbidden,
            AcademyError::OwnCourse
            | AcademyError::CourseNotCompleted
            | AcademyError::Validation(_) => ErrorKind::BadRequest,
            AcademyError::AlreadyPurchased => ErrorKind::Conflict,
            AcademyError::InvalidWebhookSignature => ErrorKind::Unauthorized,
            AcademyError::Render(_) | AcademyError::Database(_) | AcademyError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            AcademyError::Database(_) | AcademyError::Internal(_) => {
                AppError::internal("Something went wrong, please try again later")
            }
            AcademyError::Render(_) => AppError::internal("Failed to generate certificate"),
            AcademyError::CourseNotCompleted => AppError::bad_request(self.to_string())
                .with_action("Finish every lecture to unlock the certificate"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    pub(crate) fn log(&self) {
        match self {
            AcademyError::Database(e) => {
                tracing::error!(error = %e, "Academy database error");
            }
            AcademyError::Internal(msg) | AcademyError::Render(msg) => {
                tracing::error!(message = %msg, "Academy internal error");
            }
            AcademyError::InvalidWebhookSignature => {
                tracing::warn!("Rejected purchase webhook with bad signature");
            }
            _ => {
                tracing::debug!(error = %self, "Academy error");
            }
        }
    }
}

impl IntoResponse for AcademyError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AcademyError {
    fn from(err: AppError) -> Self {
        if err.kind().is_server_error() {
            AcademyError::Internal(err.to_string())
        } else {
            AcademyError::Validation(err.message().to_string())
        }
    }
}

impl From<tokio::task::JoinError> for AcademyError {
    fn from(err: tokio::task::JoinError) -> Self {
        AcademyError::Internal(format!("Blocking task failed: {err}"))
    }
}
