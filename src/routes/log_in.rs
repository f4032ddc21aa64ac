//! The route handler for logging in with an email and password.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::encode_token,
    mail::Mailer,
    models::{UserResponse, normalize_email},
    routes::parse_json,
    stores::{TransactionStore, UserStore},
};

/// The request body for logging in.
#[derive(Debug, Deserialize)]
pub struct LogInData {
    /// The email address the account was registered with.
    pub email: String,
    /// The plaintext password for the account.
    pub password: String,
}

/// The response body for a successful log-in.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogInResponse {
    /// The signed session token to send with subsequent requests.
    pub token: String,
    /// The user that logged in.
    pub user: UserResponse,
}

/// A route handler for logging in.
///
/// Responds with `200 OK`, a session token, and the logged-in user.
///
/// # Errors
///
/// This function will return an error in the following situations.
/// - The request body is missing or malformed JSON, or the password is blank.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password or signing the
///   token.
pub async fn log_in<M, T, U>(
    State(state): State<AppState<M, T, U>>,
    payload: Result<Json<LogInData>, JsonRejection>,
) -> Result<Json<LogInResponse>, Error>
where
    M: Mailer + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let log_in_data = parse_json(payload)?;

    if log_in_data.password.trim().is_empty() {
        return Err(Error::InvalidField("password is required".to_string()));
    }

    let email = normalize_email(&log_in_data.email)?;
    let user = state.user_store.get_by_email(&email)?;

    let password_is_correct = user
        .password_hash()
        .verify(&log_in_data.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = encode_token(user.id(), &state.encoding_key)?;

    Ok(Json(LogInResponse {
        token,
        user: UserResponse::from(&user),
    }))
}
