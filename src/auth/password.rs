//! Password hashing and verification.
//!
//! bcrypt embeds a random salt in every hash, so hashing the same input
//! twice yields different outputs, and verification is delegated entirely
//! to the bcrypt primitive. Plaintext never reaches the store.

use crate::error::ServiceError;

/// bcrypt cost factor
const BCRYPT_COST: u32 = 10;

pub fn hash_password(plaintext: &str) -> Result<String, ServiceError> {
    bcrypt::hash(plaintext, BCRYPT_COST)
        .map_err(|e| ServiceError::internal(format!("bcrypt hash failed: {}", e)))
}

/// Returns false for a non-matching password or an unparseable hash.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Secret123").unwrap();
        assert!(verify_password("Secret123", &hash));
        assert!(!verify_password("secret123", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("Secret123").unwrap();
        let b = hash_password("Secret123").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("Secret123", &a));
        assert!(verify_password("Secret123", &b));
    }

    #[test]
    fn test_garbage_hash_verifies_false() {
        assert!(!verify_password("Secret123", "not-a-bcrypt-hash"));
    }
}
