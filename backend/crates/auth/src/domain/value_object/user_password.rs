//! User Password Value Object
//!
//! Domain wrapper over `platform::password`: policy errors become
//! validation errors, hashing errors become internal errors.

use platform::password::{ClearTextPassword, HashedPassword};

use crate::error::{AuthError, AuthResult};

/// Stored Argon2id hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Validate the policy and hash a new password
    pub fn create(raw: String, pepper: Option<&[u8]>) -> AuthResult<Self> {
        let clear = ClearTextPassword::new(raw).map_err(|e| {
            AuthError::Validation(kernel::error::app_error::AppError::bad_request(e.to_string()))
        })?;
        let hashed = clear
            .hash(pepper)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(Self(hashed))
    }

    pub fn from_db(phc: String) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|e| AuthError::Internal(format!("Invalid stored password hash: {e}")))
    }

    pub fn verify(&self, raw: String, pepper: Option<&[u8]>) -> bool {
        let clear = ClearTextPassword::for_verification(raw);
        self.0.verify(&clear, pepper)
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }
}
