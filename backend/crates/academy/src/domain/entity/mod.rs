pub mod certificate;
pub mod course;
pub mod lecture;
pub mod member;
pub mod progress;
pub mod purchase;
