//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod client;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use client::Client;
pub use handlers::AuthAppState;
pub use middleware::{AuthMiddlewareState, CurrentUser, require_auth_session};
pub use router::{auth_router, auth_router_generic};
