//! Client secret generation and Argon2 hashing.
//!
//! Registries store only the PHC-formatted Argon2id hash of a client secret.
//! The plaintext is shown to the operator once, at generation time.
//!
//! ```
//! use grantflow_auth::secret::{generate_client_secret, hash_client_secret, verify_client_secret};
//!
//! let secret = generate_client_secret();
//! let hash = hash_client_secret(&secret).unwrap();
//! assert!(verify_client_secret(&secret, &hash).unwrap());
//! ```

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;

/// Generate a new client secret: 256 random bits as hex with a `cs_` prefix.
#[must_use]
pub fn generate_client_secret() -> String {
    let bytes: [u8; 32] = rand::thread_rng().r#gen();
    format!("cs_{}", hex::encode(bytes))
}

/// Hash a client secret for storage using Argon2id with a random salt.
///
/// # Errors
///
/// Returns `argon2::password_hash::Error` if hashing fails.
pub fn hash_client_secret(secret: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(secret.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a client secret against a stored Argon2 hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only if the stored hash is not a
/// valid PHC string.
///
/// # Errors
///
/// Returns `argon2::password_hash::Error` if the hash cannot be parsed.
pub fn verify_client_secret(
    secret: &str,
    hash: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret_format() {
        let secret = generate_client_secret();
        assert!(secret.starts_with("cs_"));
        assert_eq!(secret.len(), 67);
        assert!(hex::decode(&secret[3..]).is_ok());
    }

    #[test]
    fn test_hash_uses_argon2id() {
        let hash = hash_client_secret("s1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify() {
        let hash = hash_client_secret("s1").unwrap();
        assert!(verify_client_secret("s1", &hash).unwrap());
        assert!(!verify_client_secret("wrong", &hash).unwrap());
    }

    #[test]
    fn test_same_secret_different_salts() {
        let first = hash_client_secret("s1").unwrap();
        let second = hash_client_secret("s1").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_invalid_hash_format() {
        assert!(verify_client_secret("s1", "not-a-phc-string").is_err());
    }
}
