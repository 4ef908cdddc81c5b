//! Temporary password generation

use rand::{rngs::OsRng, Rng};
use std::fmt::Debug;

/// Characters allowed in temporary passwords
///
/// Letters exclude I, O, i, l and o; digits exclude 0 and 1.
pub const TEMPORARY_PASSWORD_ALPHABET: &[u8] =
    b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789!@#$";

/// Length of generated temporary passwords
pub const TEMPORARY_PASSWORD_LENGTH: usize = 8;

/// Source of one-time credentials for new accounts
pub trait CredentialGenerator: Send + Sync + Debug {
    fn temporary_password(&self) -> String;
}

/// Generator drawing uniformly from [`TEMPORARY_PASSWORD_ALPHABET`] with the OS RNG
#[derive(Debug, Clone, Default)]
pub struct RandomPasswordGenerator;

impl RandomPasswordGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialGenerator for RandomPasswordGenerator {
    fn temporary_password(&self) -> String {
        let mut rng = OsRng;

        (0..TEMPORARY_PASSWORD_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..TEMPORARY_PASSWORD_ALPHABET.len());
                TEMPORARY_PASSWORD_ALPHABET[idx] as char
            })
            .collect()
    }
}
