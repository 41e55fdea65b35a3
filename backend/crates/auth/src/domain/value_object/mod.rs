//! Value Object Module

pub mod display_name;
pub mod email;
pub mod user_password;
pub mod user_role;
