//! Shared Kernel
//!
//! Vocabulary every bounded context agrees on:
//! - the unified error type ([`error::app_error::AppError`]) and its HTTP mapping
//! - typed entity identifiers ([`id::Id`])
//!
//! Nothing domain-specific lives here; a type only belongs in the kernel when
//! more than one crate needs the same meaning for it.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
