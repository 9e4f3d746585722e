//! Password hashing and verification
//!
//! Hashes are Argon2id PHC strings with a random salt. Plaintext passwords and
//! hashes are never logged.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

/// Errors raised by the credential service
///
/// A wrong password is not an error; these only cover hashing failures and
/// stored hashes that cannot be parsed.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Credential service
#[derive(Clone)]
pub struct CredentialService {
    argon2: Argon2<'static>,
    dummy_hash: Arc<str>,
}

impl Default for CredentialService {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialService {
    /// Create a credential service with the default Argon2id work factor
    ///
    /// The dummy hash used for unknown login emails is computed here, so the
    /// first failed login costs the same as every later one.
    pub fn new() -> Self {
        let argon2 = Argon2::default();
        let salt = SaltString::generate(&mut rand::thread_rng());
        let dummy_hash = match argon2.hash_password(b"staykey-dummy-credential", &salt) {
            Ok(hash) => hash.to_string(),
            Err(e) => {
                error!("Failed to prepare the dummy credential hash: {}", e);
                String::new()
            }
        };

        Self {
            argon2,
            dummy_hash: dummy_hash.into(),
        }
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored hash
    ///
    /// Returns `Ok(false)` on any mismatch. Only a stored hash that cannot be
    /// parsed is reported as an error.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, CredentialError> {
        let parsed_hash =
            PasswordHash::new(hashed).map_err(|e| CredentialError::MalformedHash(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash on the blocking pool so request workers are not stalled
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, CredentialError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&plaintext))
            .await
            .map_err(|e| CredentialError::Hashing(e.to_string()))?
    }

    /// Verify on the blocking pool so request workers are not stalled
    pub async fn verify_blocking(
        &self,
        plaintext: String,
        hashed: String,
    ) -> Result<bool, CredentialError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.verify(&plaintext, &hashed))
            .await
            .map_err(|e| CredentialError::Hashing(e.to_string()))?
    }

    /// Spend the same work as a real verification and report a mismatch
    ///
    /// Used when no account matches a login email so response timing does not
    /// reveal whether the email exists.
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        let _ = self.verify(plaintext, &self.dummy_hash);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_accepts_the_same_password() {
        let service = CredentialService::new();
        let hash = service.hash("correct horse battery staple").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify("correct horse battery staple", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_a_different_password() {
        let service = CredentialService::new();
        let hash = service.hash("correct horse battery staple").unwrap();

        assert!(!service.verify("correct horse battery stapler", &hash).unwrap());
        assert!(!service.verify("", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_a_mutated_hash() {
        let service = CredentialService::new();
        let hash = service.hash("s3cret-password").unwrap();

        // Swap one character inside the digest for another base64 character
        let position = hash.len() - 5;
        let replacement = if hash.as_bytes()[position] == b'A' { "B" } else { "A" };
        let mut mutated = hash.clone();
        mutated.replace_range(position..position + 1, replacement);

        assert!(!service.verify("s3cret-password", &mutated).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let service = CredentialService::new();
        let first = service.hash("s3cret-password").unwrap();
        let second = service.hash("s3cret-password").unwrap();

        assert_ne!(first, second);
        assert!(service.verify("s3cret-password", &second).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        let service = CredentialService::new();
        let result = service.verify("anything", "not-a-phc-string");

        assert!(matches!(result, Err(CredentialError::MalformedHash(_))));
    }

    #[tokio::test]
    async fn blocking_variants_agree_with_the_sync_ones() {
        let service = CredentialService::new();
        let hash = service.hash_blocking("s3cret-password".to_string()).await.unwrap();

        assert!(
            service
                .verify_blocking("s3cret-password".to_string(), hash.clone())
                .await
                .unwrap()
        );
        assert!(
            !service
                .verify_blocking("wrong-password".to_string(), hash)
                .await
                .unwrap()
        );
    }

    #[test]
    fn dummy_hash_is_ready_after_construction() {
        let service = CredentialService::new();

        assert!(service.dummy_hash.starts_with("$argon2id$"));
        assert!(service.verify("staykey-dummy-credential", &service.dummy_hash).unwrap());

        let clone = service.clone();
        assert_eq!(clone.dummy_hash, service.dummy_hash);
    }

    #[test]
    fn dummy_verification_never_succeeds() {
        let service = CredentialService::new();

        assert!(!service.verify_dummy("staykey-dummy-credential"));
        assert!(!service.verify_dummy("anything else"));
    }
}
