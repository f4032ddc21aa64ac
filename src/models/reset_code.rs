//! This file defines the one-time code used by the password reset flow.
//! `ResetCode` is the plaintext code that is emailed to the user.
//! `ResetCodeHash` is the salted hash of the code that is persisted.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use rand::Rng;
use time::Duration;

use crate::Error;

/// How long a reset code stays valid after it is issued.
pub const RESET_CODE_DURATION: Duration = Duration::hours(1);

/// The number of digits in a reset code.
pub const RESET_CODE_LENGTH: usize = 6;

/// A one-time numeric code that proves a user can read the account's email.
///
/// The plaintext code is handed to the mail collaborator and then dropped.
/// Only its hash is persisted, see [ResetCodeHash].
#[derive(Debug, Clone, PartialEq)]
pub struct ResetCode(String);

impl ResetCode {
    /// Generate a uniformly random code of [RESET_CODE_LENGTH] digits.
    ///
    /// Codes are zero padded, so "012345" is a valid code.
    pub fn generate() -> Self {
        let number = rand::rng().random_range(0..1_000_000);

        Self(format!("{number:06}"))
    }

    /// Wrap an existing code string without generating a new one.
    ///
    /// The caller should ensure that `raw_code` is a code produced by
    /// [ResetCode::generate].
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid code is provided it may cause incorrect behaviour but will not affect memory safety.
    pub fn new_unchecked(raw_code: &str) -> Self {
        Self(raw_code.to_string())
    }

    /// The digits of the code, for inclusion in the reset email.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ResetCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", RESET_CODE_LENGTH))
    }
}

/// A salted and hashed reset code.
#[derive(Debug, Clone, PartialEq)]
pub struct ResetCodeHash(String);

impl ResetCodeHash {
    /// Hash a reset code with the specified bcrypt `cost`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the code could not be hashed.
    pub fn new(code: &ResetCode, cost: u32) -> Result<Self, Error> {
        match hash(&code.0, cost) {
            Ok(code_hash) => Ok(Self(code_hash)),
            Err(e) => Err(Error::HashingError(e.to_string())),
        }
    }

    /// Create a new `ResetCodeHash` without any validation.
    ///
    /// The caller should ensure that `raw_hash` is a valid bcrypt hash.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid hash is provided it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(raw_hash: &str) -> Self {
        Self(raw_hash.to_string())
    }

    /// Check that `raw_code` matches the stored code.
    pub fn verify(&self, raw_code: &str) -> Result<bool, BcryptError> {
        verify(raw_code, &self.0)
    }
}

impl Display for ResetCodeHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod reset_code_tests {
    use crate::models::{RESET_CODE_LENGTH, ResetCode, ResetCodeHash};

    #[test]
    fn generate_produces_six_ascii_digits() {
        let code = ResetCode::generate();

        assert_eq!(code.as_str().len(), RESET_CODE_LENGTH);
        assert!(code.as_str().chars().all(|ch| ch.is_ascii_digit()));
    }

    #[test]
    fn display_masks_the_code() {
        let code = ResetCode::new_unchecked("123456");

        assert_eq!(code.to_string(), "******");
    }

    #[test]
    fn hash_verifies_the_original_code() {
        let code = ResetCode::new_unchecked("042117");
        let code_hash = ResetCodeHash::new(&code, 4).unwrap();

        assert!(code_hash.verify("042117").unwrap());
    }

    #[test]
    fn hash_rejects_a_different_code() {
        let code = ResetCode::new_unchecked("042117");
        let code_hash = ResetCodeHash::new(&code, 4).unwrap();

        assert!(!code_hash.verify("042118").unwrap());
    }
}
