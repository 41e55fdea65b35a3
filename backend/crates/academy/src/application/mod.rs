//! Application Layer
//!
//! Use cases and configuration.

pub mod account;
pub mod certificate;
pub mod config;
pub mod course;
pub mod lecture;
pub mod progress;
pub mod purchase;

pub use account::AccountCleanupUseCase;
pub use certificate::{CertificateUseCase, IssuedCertificate};
pub use config::AcademyConfig;
pub use course::{CourseCard, CourseDetail, CourseUseCase};
pub use lecture::LectureUseCase;
pub use progress::{ProgressUseCase, ProgressView};
pub use purchase::{CheckoutOrder, ConfirmOutcome, PurchaseUseCase, PurchasedCourse};
