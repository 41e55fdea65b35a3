//! Payment reference: correlates a checkout with the gateway's confirmation.
//!
//! Format is `TXN_` followed by 24 lowercase hex characters.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const REFERENCE_PREFIX: &str = "TXN_";
const RANDOM_BYTES: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentReference(String);

impl PaymentReference {
    pub fn generate() -> Self {
        let random = platform::crypto::random_bytes(RANDOM_BYTES);
        Self(format!(
            "{REFERENCE_PREFIX}{}",
            platform::crypto::to_hex(&random)
        ))
    }

    /// `None` for anything that could never have been issued
    pub fn parse(raw: &str) -> Option<Self> {
        let hex = raw.trim().strip_prefix(REFERENCE_PREFIX)?;
        let well_formed = hex.len() == RANDOM_BYTES * 2
            && hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
        well_formed.then(|| Self(raw.trim().to_string()))
    }

    pub fn from_db(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
