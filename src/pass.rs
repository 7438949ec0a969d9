use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::Pbkdf2;
use rand_core::OsRng;

use crate::Error;

/// Hashes a plaintext password into a PHC string with a fresh random salt.
/// Hashing the same input twice yields distinct digests.
pub fn hash_password(plain: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Pbkdf2.hash_password(plain.as_bytes(), &salt)?;
    Ok(digest.to_string())
}

/// Returns true iff `plain` matches the material behind `digest`.
/// A malformed digest verifies as false, it never errors.
pub fn verify_password(digest: &str, plain: &str) -> bool {
    match PasswordHash::new(digest) {
        Ok(parsed) => Pbkdf2.verify_password(plain.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_salts_yield_distinct_digests() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn verify_accepts_matching_password() {
        let digest = hash_password("hunter2").unwrap();
        assert!(verify_password(&digest, "hunter2"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let digest = hash_password("hunter2").unwrap();
        assert!(!verify_password(&digest, "hunter3"));
    }

    #[test]
    fn verify_rejects_malformed_digest() {
        assert!(!verify_password("not-a-phc-string", "hunter2"));
        assert!(!verify_password("", "hunter2"));
    }
}
