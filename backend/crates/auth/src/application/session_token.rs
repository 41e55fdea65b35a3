//! Session cookie token: `<session-uuid>.<base64url(HMAC-SHA256(secret, uuid))>`

use platform::crypto::{from_base64_url, hmac_sha256, to_base64_url, verify_hmac_sha256};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

pub fn issue(secret: &[u8], session_id: Uuid) -> String {
    let id = session_id.to_string();
    let tag = hmac_sha256(secret, id.as_bytes());
    format!("{}.{}", id, to_base64_url(&tag))
}

/// Verify the signature and return the session id
pub fn parse(secret: &[u8], token: &str) -> AuthResult<Uuid> {
    let (id, signature) = token.split_once('.').ok_or(AuthError::SessionInvalid)?;
    let tag = from_base64_url(signature).map_err(|_| AuthError::SessionInvalid)?;

    if !verify_hmac_sha256(secret, id.as_bytes(), &tag) {
        return Err(AuthError::SessionInvalid);
    }

    id.parse().map_err(|_| AuthError::SessionInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [42u8; 32];

    #[test]
    fn test_issue_then_parse() {
        let id = Uuid::new_v4();
        let token = issue(&SECRET, id);
        assert!(token.starts_with(&id.to_string()));
        assert_eq!(parse(&SECRET, &token).unwrap(), id);
    }

    #[test]
    fn test_rejects_other_secret() {
        let token = issue(&SECRET, Uuid::new_v4());
        assert!(matches!(
            parse(&[1u8; 32], &token),
            Err(AuthError::SessionInvalid)
        ));
    }

    #[test]
    fn test_rejects_swapped_id() {
        let token = issue(&SECRET, Uuid::new_v4());
        let (_, sig) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", Uuid::new_v4(), sig);
        assert!(parse(&SECRET, &forged).is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(parse(&SECRET, "").is_err());
        assert!(parse(&SECRET, "no-dot").is_err());
        assert!(parse(&SECRET, "a.b.c").is_err());
        assert!(parse(&SECRET, "abc.!!!").is_err());
    }
}
