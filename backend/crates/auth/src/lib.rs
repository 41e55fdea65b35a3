//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Registration and login with email + password
//! - Server-side sessions referenced by a signed cookie token
//! - Student / Instructor roles, with self-service promotion
//! - `require_auth_session` middleware injecting [`CurrentUser`]
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (optional pepper)
//! - Cookie token is `<session-id>.<HMAC-SHA256>` so forged ids never hit the database
//! - Sessions bound to a client fingerprint (User-Agent hash)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use application::config::AuthConfig;
pub use domain::value_object::user_role::UserRole;
pub use error::{AuthError, AuthResult};
pub use infra::memory::InMemoryAuthRepository;
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::{AuthMiddlewareState, CurrentUser, require_auth_session};
pub use presentation::router::{auth_router, auth_router_generic};

pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
