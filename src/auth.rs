//! Operator password hashing

use crate::Result;

/// Hash a password with bcrypt at the given cost
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check a password against a stored bcrypt hash.
///
/// Malformed hashes count as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests fast
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret!", TEST_COST).unwrap();
        assert_ne!(hash, "s3cret!");
        assert!(verify_password("s3cret!", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_invalid_cost_is_an_error() {
        assert!(hash_password("pw", 2).is_err());
    }
}
