//! This file defines a user of the application and its supporting types.

use std::{fmt::Display, str::FromStr};

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    models::{PasswordHash, ResetCodeHash},
};

/// A newtype wrapper for integer user IDs.
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Wrap an integer ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw integer ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Normalize and validate an email address from client input.
///
/// Leading and trailing whitespace is removed and the address is lowercased
/// before validation, so `" Foo@Bar.Com "` and `"foo@bar.com"` refer to the
/// same account.
///
/// # Errors
///
/// Returns an [Error::InvalidField] if the trimmed address is empty or is not
/// a syntactically valid email address.
pub fn normalize_email(raw_email: &str) -> Result<EmailAddress, Error> {
    let normalized = raw_email.trim().to_lowercase();

    if normalized.is_empty() {
        return Err(Error::InvalidField("email is required".to_string()));
    }

    EmailAddress::from_str(&normalized)
        .map_err(|error| Error::InvalidField(format!("invalid email address: {error}")))
}

/// The data needed to insert a new user into a [UserStore](crate::stores::UserStore).
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The user's display name.
    pub name: String,
    /// The user's normalized email address.
    pub email: EmailAddress,
    /// The hash of the user's password.
    pub password_hash: PasswordHash,
    /// The starting balance for the user's ledger.
    pub balance: f64,
}

/// A user of the application.
///
/// Users are created through [UserStore::create](crate::stores::UserStore::create)
/// and retrieved through the other `UserStore` methods.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserID,
    name: String,
    email: EmailAddress,
    password_hash: PasswordHash,
    balance: f64,
    reset_code_hash: Option<ResetCodeHash>,
    reset_code_expires_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
}

impl User {
    /// Create a user from its stored fields.
    ///
    /// This is intended for stores mapping database rows back into the model,
    /// the fields are in table column order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: UserID,
        name: String,
        email: EmailAddress,
        password_hash: PasswordHash,
        balance: f64,
        reset_code_hash: Option<ResetCodeHash>,
        reset_code_expires_at: Option<OffsetDateTime>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
            balance,
            reset_code_hash,
            reset_code_expires_at,
            created_at,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The user's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The email address associated with the user.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// The user's current balance, the sum of their income transactions minus
    /// their expense transactions.
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// The hash of the pending password reset code, if one has been requested.
    pub fn reset_code_hash(&self) -> Option<&ResetCodeHash> {
        self.reset_code_hash.as_ref()
    }

    /// When the pending password reset code stops being valid.
    pub fn reset_code_expires_at(&self) -> Option<OffsetDateTime> {
        self.reset_code_expires_at
    }

    /// When the user registered.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

/// The view of a [User] that is safe to send to clients.
///
/// The password hash and reset code material are deliberately not part of
/// this type, so they cannot end up in a response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    /// The user's ID in the database.
    pub id: UserID,
    /// The user's display name.
    pub name: String,
    /// The email address associated with the user.
    pub email: EmailAddress,
    /// The user's current balance.
    pub balance: f64,
    /// When the user registered.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            balance: user.balance,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod normalize_email_tests {
    use crate::{Error, models::normalize_email};

    #[test]
    fn trims_and_lowercases() {
        let email = normalize_email("  Foo@Bar.Com ").unwrap();

        assert_eq!(email.as_str(), "foo@bar.com");
    }

    #[test]
    fn fails_on_empty() {
        let result = normalize_email("   ");

        assert!(matches!(result, Err(Error::InvalidField(_))));
    }

    #[test]
    fn fails_on_invalid_address() {
        let result = normalize_email("not an email");

        assert!(matches!(result, Err(Error::InvalidField(_))));
    }
}
