//! Password hashing utilities using Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a password with a fresh random salt
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a hash
    ///
    /// The digest comparison is constant-time; malformed hashes never verify.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Lowest accepted memory cost (OWASP baseline for Argon2id)
pub const MIN_MEMORY_KIB: u32 = 19_456;
/// Lowest accepted iteration count
pub const MIN_ITERATIONS: u32 = 2;

/// Argon2id password hasher with a configurable work factor
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher with the library's recommended cost
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Create a hasher with an explicit cost; settings below the floor are rejected
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, DomainError> {
        if memory_kib < MIN_MEMORY_KIB || iterations < MIN_ITERATIONS {
            return Err(DomainError::configuration(format!(
                "Password hashing cost too low: m={} t={} (minimum m={} t={})",
                memory_kib, iterations, MIN_MEMORY_KIB, MIN_ITERATIONS
            )));
        }

        let params = Params::new(memory_kib, iterations, parallelism, None).map_err(|e| {
            DomainError::configuration(format!("Invalid password hashing parameters: {}", e))
        })?;

        Ok(Self { params })
    }

    /// Cheap hasher for tests
    #[cfg(test)]
    pub(crate) fn fast() -> Self {
        Self {
            params: Params::new(1024, 1, 1, None).expect("valid test params"),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        // Cost parameters are read back from the PHC string
        self.argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> Argon2Hasher {
        Argon2Hasher::fast()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let password = "my_secure_password";

        let hash = hasher.hash(password).unwrap();

        assert!(hasher.verify(password, &hash));
        assert!(!hasher.verify("wrong_password", &hash));
    }

    #[test]
    fn test_hash_is_unique() {
        let hasher = fast_hasher();
        let password = "my_secure_password";

        let hash1 = hasher.hash(password).unwrap();
        let hash2 = hasher.hash(password).unwrap();

        // Hashes should be different due to random salt
        assert_ne!(hash1, hash2);

        assert!(hasher.verify(password, &hash1));
        assert!(hasher.verify(password, &hash2));
    }

    #[test]
    fn test_hash_records_work_factor() {
        let hasher = fast_hasher();
        let hash = hasher.hash("secret").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=1024,t=1,p=1"));
    }

    #[test]
    fn test_verify_across_cost_settings() {
        let hash = fast_hasher().hash("secret").unwrap();

        // A hasher configured differently still verifies older hashes
        let other = Argon2Hasher::new();
        assert!(other.verify("secret", &hash));
    }

    #[test]
    fn test_invalid_cost_is_configuration_error() {
        let result = Argon2Hasher::with_cost(MIN_MEMORY_KIB, MIN_ITERATIONS, 0);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_cost_below_floor_is_rejected() {
        for (memory_kib, iterations) in [(8, 1), (MIN_MEMORY_KIB - 1, 2), (MIN_MEMORY_KIB, 1)] {
            let result = Argon2Hasher::with_cost(memory_kib, iterations, 1);
            assert!(
                matches!(result, Err(DomainError::Configuration { ref message }) if message.starts_with("Password hashing cost too low")),
                "m={} t={} accepted",
                memory_kib,
                iterations
            );
        }

        assert!(Argon2Hasher::with_cost(MIN_MEMORY_KIB, MIN_ITERATIONS, 1).is_ok());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = fast_hasher();

        assert!(!hasher.verify("password", "invalid_hash_format"));
        assert!(!hasher.verify("password", ""));
    }
}
