//! Application Configuration

#[derive(Debug, Clone)]
pub struct AcademyConfig {
    /// ISO 4217 code attached to every purchase
    pub currency: String,
    /// HMAC key the payment gateway signs webhook bodies with.
    /// `None` accepts unsigned webhooks (development only).
    pub webhook_secret: Option<[u8; 32]>,
    /// Organisation name printed on certificates
    pub certificate_brand: String,
    pub suggestion_limit: i64,
}

impl Default for AcademyConfig {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            webhook_secret: None,
            certificate_brand: "LMS Academy".to_string(),
            suggestion_limit: 6,
        }
    }
}

impl AcademyConfig {
    pub fn with_random_webhook_secret() -> Self {
        Self {
            webhook_secret: Some(platform::crypto::random_secret()),
            ..Default::default()
        }
    }

    /// Unsigned webhooks accepted
    pub fn development() -> Self {
        Self::default()
    }
}
