//! The route handlers for the password reset flow.
//!
//! Resetting a password is a two step process. `forgot_password` emails the
//! user a one-time code, and `reset_password` exchanges that code for a new
//! password. Only the hash of the code is persisted, the plaintext goes to
//! the mailer and is then dropped.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    mail::Mailer,
    models::{
        PasswordHash, RESET_CODE_DURATION, ResetCode, ResetCodeHash, ValidatedPassword,
        normalize_email,
    },
    routes::parse_json,
    stores::{TransactionStore, UserStore},
};

/// The request body for requesting a password reset code.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordData {
    /// The email address the account was registered with.
    pub email: String,
}

/// The request body for completing a password reset.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordData {
    /// The email address the account was registered with.
    pub email: String,
    /// The one-time code that was emailed to the user.
    pub reset_code: String,
    /// The plaintext password to replace the old one with.
    pub new_password: String,
}

/// A route handler for requesting a password reset code.
///
/// Generates a one-time code, stores its hash with an expiry of
/// [RESET_CODE_DURATION] from now, and emails the plaintext code to the
/// user. Requesting a new code replaces any previous pending code.
///
/// # Errors
///
/// This function will return an error in the following situations.
/// - The request body is missing or malformed JSON, or the email is invalid.
/// - The email does not belong to a registered user.
/// - The reset email could not be delivered. The stored code is kept, so a
///   delivery retry does not need a new code.
pub async fn forgot_password<M, T, U>(
    State(mut state): State<AppState<M, T, U>>,
    payload: Result<Json<ForgotPasswordData>, JsonRejection>,
) -> Result<Json<Value>, Error>
where
    M: Mailer + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let forgot_password_data = parse_json(payload)?;

    let email = normalize_email(&forgot_password_data.email)?;
    let user = state.user_store.get_by_email(&email)?;

    let reset_code = ResetCode::generate();
    let code_hash = ResetCodeHash::new(&reset_code, PasswordHash::DEFAULT_COST)?;
    let expires_at = OffsetDateTime::now_utc() + RESET_CODE_DURATION;

    state
        .user_store
        .set_reset_code(user.id(), code_hash, expires_at)?;

    state
        .mailer
        .send_reset_code(user.email(), user.name(), &reset_code)?;

    Ok(Json(json!({
        "message": "a reset code has been sent to your email address"
    })))
}

/// A route handler for completing a password reset.
///
/// Verifies the one-time code from the reset email and replaces the user's
/// password. A code can only be used once, completing the reset clears it.
///
/// # Errors
///
/// This function will return an error in the following situations.
/// - The request body is missing or malformed JSON, or the email is invalid.
/// - The new password does not meet the complexity policy.
/// - The email does not belong to a registered user.
/// - No reset code is pending, or the given code does not match.
/// - The pending reset code has expired.
pub async fn reset_password<M, T, U>(
    State(mut state): State<AppState<M, T, U>>,
    payload: Result<Json<ResetPasswordData>, JsonRejection>,
) -> Result<Json<Value>, Error>
where
    M: Mailer + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let reset_password_data = parse_json(payload)?;

    let new_password = ValidatedPassword::new(&reset_password_data.new_password)?;
    let email = normalize_email(&reset_password_data.email)?;
    let user = state.user_store.get_by_email(&email)?;

    let (Some(code_hash), Some(expires_at)) =
        (user.reset_code_hash(), user.reset_code_expires_at())
    else {
        return Err(Error::InvalidResetCode);
    };

    if OffsetDateTime::now_utc() > expires_at {
        return Err(Error::ExpiredResetCode);
    }

    let code_is_correct = code_hash
        .verify(&reset_password_data.reset_code)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !code_is_correct {
        return Err(Error::InvalidResetCode);
    }

    let password_hash = PasswordHash::new(new_password, PasswordHash::DEFAULT_COST)?;
    state.user_store.update_password(user.id(), password_hash)?;

    Ok(Json(json!({
        "message": "password reset successfully"
    })))
}
