//! Academy Backend Module
//!
//! Everything a learner or instructor does after signing in:
//! - Course and lecture authoring (instructors, creator-only mutation)
//! - Public catalogue: published listing, search, suggestions
//! - Purchase workflow: checkout, gateway webhook confirmation, status
//! - Per-learner progress tracking and completion certificates (PDF)
//! - Account deletion with an explicit cascade over everything a user owns
//!
//! Layout follows the auth crate: `domain/`, `application/`, `infra/`,
//! `presentation/`. Handlers read the caller from `auth::CurrentUser`.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use application::config::AcademyConfig;
pub use domain::repository::AcademyStore;
pub use error::{AcademyError, AcademyResult};
pub use infra::memory::InMemoryAcademyRepository;
pub use infra::pdf::PrintPdfRenderer;
pub use infra::postgres::PgAcademyRepository;
pub use presentation::handlers::AcademyAppState;
pub use presentation::router::{account_router, course_router, progress_router, purchase_router};
