use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordVerifier};

/// Verify a candidate password against an argon2 hash string.
///
/// Returns `true` if the password matches. An unparseable hash never matches.
pub fn verify_password(hash: &str, candidate: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tests::hash;

    #[test]
    fn matches_own_hash() {
        let h = hash("s3cret");
        assert!(verify_password(&h, "s3cret"));
        assert!(!verify_password(&h, "S3cret"));
    }

    #[test]
    fn garbage_hash_never_matches() {
        assert!(!verify_password("not-a-phc-string", "anything"));
        assert!(!verify_password("", ""));
    }
}
