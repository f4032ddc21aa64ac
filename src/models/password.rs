//! This file defines types that handle password validation and hashing.
//! `ValidatedPassword` wraps a string and ensures it meets the complexity policy.
//! `PasswordHash` converts a `ValidatedPassword` into a salted and hashed password.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};

use crate::Error;

/// The symbols that count towards the symbol requirement of the password
/// policy. Characters outside letters, digits, and this set are rejected.
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// The minimum number of characters in a password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A password that has been validated, but not yet hashed.
///
/// This struct can be used to construct a [PasswordHash].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Create and validate a new password from a string.
    ///
    /// A valid password has at least [MIN_PASSWORD_LENGTH] characters and
    /// contains at least one lowercase letter, one uppercase letter, one
    /// digit, and one symbol from [PASSWORD_SYMBOLS]. No other characters
    /// are allowed.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password does not meet the policy.
    /// The error message will explain which requirement failed.
    pub fn new(raw_password_string: &str) -> Result<Self, Error> {
        if let Some(invalid) = raw_password_string
            .chars()
            .find(|ch| !ch.is_ascii_alphanumeric() && !PASSWORD_SYMBOLS.contains(*ch))
        {
            return Err(Error::TooWeak(format!(
                "the character {invalid:?} is not allowed, use letters, digits, and {PASSWORD_SYMBOLS}"
            )));
        }

        if raw_password_string.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::TooWeak(format!(
                "must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }

        if !raw_password_string.chars().any(|ch| ch.is_ascii_lowercase()) {
            return Err(Error::TooWeak(
                "must contain at least one lowercase letter".to_string(),
            ));
        }

        if !raw_password_string.chars().any(|ch| ch.is_ascii_uppercase()) {
            return Err(Error::TooWeak(
                "must contain at least one uppercase letter".to_string(),
            ));
        }

        if !raw_password_string.chars().any(|ch| ch.is_ascii_digit()) {
            return Err(Error::TooWeak(
                "must contain at least one digit".to_string(),
            ));
        }

        if !raw_password_string
            .chars()
            .any(|ch| PASSWORD_SYMBOLS.contains(ch))
        {
            return Err(Error::TooWeak(format!(
                "must contain at least one of the symbols {PASSWORD_SYMBOLS}"
            )));
        }

        Ok(Self(raw_password_string.to_string()))
    }

    /// Create a new `ValidatedPassword` without any validation.
    ///
    /// The caller should ensure that `raw_password_string` meets the password policy.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid password is provided it may cause incorrect behaviour but will not affect memory safety.
    pub fn new_unchecked(raw_password_string: &str) -> Self {
        Self(raw_password_string.to_string())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Create a hashed password from a validated password with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to verify a password.
    /// A value of at least 12 is recommended. Pass in [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password could not be hashed.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        match hash(&password.0, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(e) => Err(Error::HashingError(e.to_string())),
        }
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid password hash.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid hash is provided it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Try to create a password hash from a raw password string.
    ///
    /// This is a convenience function that removes the need to manually create
    /// the intermediate `ValidatedPassword` type.
    ///
    /// This function is used instead of `From<String>` or `FromStr` to make it a bit clearer that
    /// we are not parsing an existing password hash.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        let validated_password = ValidatedPassword::new(raw_password)?;
        PasswordHash::new(validated_password, cost)
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod validated_password_tests {
    use crate::{Error, models::ValidatedPassword};

    #[test]
    fn new_fails_on_empty() {
        let result = ValidatedPassword::new("");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_fails_on_short_password() {
        let result = ValidatedPassword::new("Ab1@tok");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_fails_without_lowercase_letter() {
        let result = ValidatedPassword::new("ABCDEF1@");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_fails_without_uppercase_letter() {
        let result = ValidatedPassword::new("abcdef1@");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_fails_without_digit() {
        let result = ValidatedPassword::new("Abcdefg@");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_fails_without_symbol() {
        let result = ValidatedPassword::new("Abcdefg1");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_fails_on_disallowed_character() {
        let result = ValidatedPassword::new("Abcdef1! ");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_succeeds_on_policy_password() {
        let result = ValidatedPassword::new("Abcdef1!");

        assert!(result.is_ok());
    }
}

#[cfg(test)]
mod password_hash_tests {
    use crate::models::{PasswordHash, ValidatedPassword};

    #[test]
    fn verify_password_succeeds_for_valid_password() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );
        let password = "okon";

        assert!(hash.verify(password).unwrap());
    }

    #[test]
    fn verify_password_fails_for_invalid_password() {
        let hash = PasswordHash::new_unchecked(
            "$2b$12$Gwf0uvxH3L7JLfo0CC/NCOoijK2vQ/wbgP.LeNup8vj6gg31IiFkm",
        );
        let password = "thewrongpassword";

        assert!(!hash.verify(password).unwrap());
    }

    #[test]
    fn hash_password_produces_verifiable_hash() {
        let password = "Roosters1!";
        let wrong_password = "Roosters2!";
        let hash = PasswordHash::from_raw_password(password, 4).unwrap();

        assert!(hash.verify(password).unwrap());
        assert!(!hash.verify(wrong_password).unwrap());
    }

    #[test]
    fn hash_duplicate_password_produces_unique_hash() {
        let password = ValidatedPassword::new("Turkeys1@").unwrap();
        let hash = PasswordHash::new(password.clone(), 4).unwrap();
        let dupe_hash = PasswordHash::new(password.clone(), 4).unwrap();

        assert_ne!(hash, dupe_hash);
    }

    #[test]
    fn from_raw_password_fails_on_weak_password() {
        let hash = PasswordHash::from_raw_password("password1234", 4);

        assert!(hash.is_err());
    }

    #[test]
    fn from_raw_password_succeeds_on_policy_password() {
        let hash = PasswordHash::from_raw_password("Secure!Password123", 4);

        assert!(hash.is_ok());
    }
}
