//! Argon2id password hashing and verification.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`], so hashing the same password twice yields two
//! different PHC strings. Compare with [`verify_password`], never with `==`.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// The hashing primitive itself could not run.
#[derive(Debug, thiserror::Error)]
#[error("Password hashing failed: {0}")]
pub struct HashingFailure(String);

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(password: &str) -> Result<String, HashingFailure> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| HashingFailure(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Any mismatch, including a stored hash that does not parse or uses another
/// algorithm, is `Ok(false)`. Only a failure inside the primitive is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, HashingFailure> {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return Ok(false);
    };
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Crypto) => {
            Err(HashingFailure("argon2 primitive error".into()))
        }
        Err(_) => Ok(false),
    }
}

/// Argon2id hash of a throwaway password, computed once on first use.
fn dummy_hash() -> Result<&'static str, HashingFailure> {
    static DUMMY: OnceLock<String> = OnceLock::new();
    if let Some(hash) = DUMMY.get() {
        return Ok(hash);
    }
    let hash = hash_password("magicstream-absent-account")?;
    Ok(DUMMY.get_or_init(|| hash))
}

/// Run one full verification against a dummy hash for a login whose email
/// matched no account, so it costs the same as a wrong password.
pub fn verify_absent_account(password: &str) -> Result<(), HashingFailure> {
    verify_password(password, dummy_hash()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");

        // The hash must be a valid PHC string starting with the argon2id identifier.
        assert!(
            hash.starts_with("$argon2id$"),
            "expected argon2id PHC prefix"
        );

        let verified = verify_password(password, &hash).expect("verify should succeed");
        assert!(verified, "correct password should verify as true");
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("real-password").expect("hashing should succeed");
        let verified = verify_password("wrong-password", &hash).expect("verify should succeed");
        assert!(!verified, "wrong password should verify as false");
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let a = hash_password("secret1").expect("hashing should succeed");
        let b = hash_password("secret1").expect("hashing should succeed");
        assert_ne!(a, b, "random salt must make hashes differ");
        assert!(verify_password("secret1", &a).unwrap());
        assert!(verify_password("secret1", &b).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        assert!(!verify_password("anything", "").unwrap());
        assert!(!verify_password("anything", "not-a-phc-string").unwrap());
        assert!(!verify_password(
            "anything",
            "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy"
        )
        .unwrap());
    }

    #[test]
    fn test_empty_password_round_trips() {
        let hash = hash_password("").expect("hashing should succeed");
        assert!(verify_password("", &hash).unwrap());
        assert!(!verify_password(" ", &hash).unwrap());
    }

    #[test]
    fn test_dummy_hash_is_a_real_argon2id_hash() {
        let dummy = dummy_hash().expect("hashing should succeed");
        assert!(PasswordHash::new(dummy).is_ok());
        assert!(dummy.starts_with("$argon2id$"));
        assert_eq!(dummy_hash().unwrap(), dummy, "computed only once");
        assert!(!verify_password("hunter22", dummy).unwrap());
        verify_absent_account("hunter22").expect("verification should run");
    }
}
