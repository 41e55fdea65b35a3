//! Platform Crate - Technical Infrastructure
//!
//! Shared technical building blocks with no domain knowledge:
//! - Cryptographic utilities (random bytes, SHA-256, HMAC-SHA256, Base64, hex)
//! - Password hashing (Argon2id)
//! - Cookie building and parsing
//! - Client fingerprinting from request headers

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
