//! Infrastructure Layer
//!
//! PostgreSQL and in-memory repositories, and the PDF certificate renderer.

pub mod memory;
pub mod pdf;
pub mod postgres;

pub use memory::InMemoryAcademyRepository;
pub use pdf::PrintPdfRenderer;
pub use postgres::PgAcademyRepository;
