pub mod course_level;
pub mod media;
pub mod payment_reference;
pub mod search;
