//! Domain Layer
//!
//! Entities, value objects, repository traits and the certificate
//! renderer seam.

pub mod entity;
pub mod repository;
pub mod services;
pub mod value_object;

pub use entity::{
    certificate::Certificate, course::Course, lecture::Lecture, member::Member,
    progress::CourseProgress, purchase::CoursePurchase,
};
pub use repository::AcademyStore;
pub use services::CertificateRenderer;
