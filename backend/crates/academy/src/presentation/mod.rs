//! Presentation Layer
//!
//! HTTP handlers, DTOs, and routers. Authentication comes from the auth
//! crate's session middleware.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::{AcademyAppState, AccountAppState};
pub use router::{account_router, course_router, progress_router, purchase_router};
