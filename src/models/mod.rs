//! This module defines the domain data types.

pub use password::{MIN_PASSWORD_LENGTH, PASSWORD_SYMBOLS, PasswordHash, ValidatedPassword};
pub use reset_code::{RESET_CODE_DURATION, RESET_CODE_LENGTH, ResetCode, ResetCodeHash};
pub use transaction::{NewTransaction, Transaction, TransactionType};
pub use user::{NewUser, User, UserID, UserResponse, normalize_email};

mod password;
mod reset_code;
mod transaction;
mod user;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
