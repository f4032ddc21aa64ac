//! Defines the user store trait.

use email_address::EmailAddress;
use time::OffsetDateTime;

use crate::{
    Error,
    models::{NewUser, PasswordHash, ResetCodeHash, User, UserID},
};

/// Handles the creation and retrieval of User objects.
pub trait UserStore {
    /// Create a new user.
    ///
    /// Returns [Error::DuplicateEmail] if the email address is already
    /// registered.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get a user by their email.
    ///
    /// Returns [Error::NotFound] if no user with the given email exists.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;

    /// Store the hash of a pending password reset code and when it expires,
    /// replacing any previous pending code.
    fn set_reset_code(
        &mut self,
        user_id: UserID,
        code_hash: ResetCodeHash,
        expires_at: OffsetDateTime,
    ) -> Result<(), Error>;

    /// Replace the user's password hash and clear any pending reset code.
    fn update_password(&mut self, user_id: UserID, password_hash: PasswordHash)
    -> Result<(), Error>;
}
