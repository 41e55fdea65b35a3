//! Domain services

use crate::domain::entity::certificate::Certificate;
use crate::error::AcademyResult;

/// Turns a certificate into a printable document.
///
/// Rendering is CPU-bound; callers run it on the blocking pool.
pub trait CertificateRenderer: Send + Sync + 'static {
    fn render(&self, certificate: &Certificate) -> AcademyResult<Vec<u8>>;

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }
}
