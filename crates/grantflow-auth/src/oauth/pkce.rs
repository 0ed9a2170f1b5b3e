//! Proof Key for Code Exchange (RFC 7636), S256 only.
//!
//! The challenge travels with the authorization request and is recorded in
//! the grant context. The verifier arrives with the token request and must
//! hash to that challenge.
//!
//! ```
//! use grantflow_auth::oauth::{PkceChallenge, PkceVerifier};
//!
//! let verifier = PkceVerifier::generate();
//! let challenge = PkceChallenge::from_verifier(&verifier);
//!
//! let recorded = PkceChallenge::new(challenge.as_str().to_string()).unwrap();
//! assert!(recorded.verify(&verifier).is_ok());
//! ```

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

use crate::error::AuthError;

/// Length of a base64url-encoded SHA-256 digest without padding.
const S256_CHALLENGE_LEN: usize = 43;

/// Errors that can occur during PKCE operations.
#[derive(Debug, thiserror::Error)]
pub enum PkceError {
    /// Verifier length is outside the valid range (43-128 characters).
    #[error("Invalid verifier length: must be 43-128 characters, got {0}")]
    InvalidVerifierLength(usize),

    /// Verifier contains characters outside `[A-Za-z0-9-._~]`.
    #[error("Invalid verifier characters: must be unreserved URI characters")]
    InvalidVerifierCharacters,

    /// Challenge is not a base64url SHA-256 digest.
    #[error("Invalid challenge format: must be a base64url SHA-256 digest")]
    InvalidChallengeFormat,

    /// Unsupported challenge method.
    #[error("Unsupported challenge method: {0}. Only S256 is supported.")]
    UnsupportedMethod(String),

    /// The verifier does not hash to the challenge.
    #[error("PKCE verification failed: verifier does not match challenge")]
    VerificationFailed,
}

impl PkceError {
    /// Returns `true` if this is a malformed-parameter error.
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        !matches!(self, Self::VerificationFailed)
    }
}

impl From<PkceError> for AuthError {
    fn from(err: PkceError) -> Self {
        if err.is_format_error() {
            AuthError::invalid_request(err.to_string())
        } else {
            AuthError::PkceVerificationFailed
        }
    }
}

// =============================================================================
// PKCE Challenge Method
// =============================================================================

/// PKCE challenge method. `plain` is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PkceChallengeMethod {
    /// SHA-256 hash.
    #[default]
    S256,
}

impl PkceChallengeMethod {
    /// Parse challenge method from string.
    ///
    /// # Errors
    ///
    /// Returns `PkceError::UnsupportedMethod` for anything other than `S256`.
    pub fn parse(method: &str) -> Result<Self, PkceError> {
        match method {
            "S256" => Ok(Self::S256),
            other => Err(PkceError::UnsupportedMethod(other.to_string())),
        }
    }

    /// Get the method as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S256 => "S256",
        }
    }
}

impl std::fmt::Display for PkceChallengeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// PKCE Verifier
// =============================================================================

/// PKCE code verifier: 43-128 unreserved characters.
#[derive(Debug, Clone)]
pub struct PkceVerifier(String);

impl PkceVerifier {
    /// Create a new verifier from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is not 43-128 or a character is not
    /// one of `[A-Za-z0-9-._~]`.
    pub fn new(verifier: String) -> Result<Self, PkceError> {
        let len = verifier.len();
        if !(43..=128).contains(&len) {
            return Err(PkceError::InvalidVerifierLength(len));
        }

        if !verifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~'))
        {
            return Err(PkceError::InvalidVerifierCharacters);
        }

        Ok(Self(verifier))
    }

    /// Generate a verifier from 32 random bytes (43 base64url characters).
    #[must_use]
    pub fn generate() -> Self {
        use rand::Rng;
        let bytes: [u8; 32] = rand::thread_rng().r#gen();
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Get the verifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// PKCE Challenge
// =============================================================================

/// PKCE code challenge: `BASE64URL(SHA256(ASCII(code_verifier)))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceChallenge(String);

impl PkceChallenge {
    /// Derive the S256 challenge for a verifier.
    #[must_use]
    pub fn from_verifier(verifier: &PkceVerifier) -> Self {
        let hash = Sha256::digest(verifier.0.as_bytes());
        Self(URL_SAFE_NO_PAD.encode(hash))
    }

    /// Accept a challenge received from a client.
    ///
    /// # Errors
    ///
    /// Returns `PkceError::InvalidChallengeFormat` unless the value decodes as
    /// base64url to exactly 32 bytes.
    pub fn new(challenge: String) -> Result<Self, PkceError> {
        if challenge.len() != S256_CHALLENGE_LEN {
            return Err(PkceError::InvalidChallengeFormat);
        }
        match URL_SAFE_NO_PAD.decode(&challenge) {
            Ok(bytes) if bytes.len() == 32 => Ok(Self(challenge)),
            _ => Err(PkceError::InvalidChallengeFormat),
        }
    }

    /// Verify that a verifier matches this challenge.
    ///
    /// # Errors
    ///
    /// Returns `PkceError::VerificationFailed` if the verifier doesn't match.
    pub fn verify(&self, verifier: &PkceVerifier) -> Result<(), PkceError> {
        if Self::from_verifier(verifier) == *self {
            Ok(())
        } else {
            Err(PkceError::VerificationFailed)
        }
    }

    /// Get the challenge as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
