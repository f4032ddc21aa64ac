//! The route handler for registering a new user account.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    mail::Mailer,
    models::{NewUser, PasswordHash, UserResponse, normalize_email},
    routes::parse_json,
    stores::{TransactionStore, UserStore},
};

/// The request body for creating a new user account.
#[derive(Debug, Deserialize)]
pub struct RegisterData {
    /// The display name for the new user.
    pub name: String,
    /// The email address to register. It is normalized before use, so casing
    /// and surrounding whitespace do not matter.
    pub email: String,
    /// The plaintext password for the new account.
    pub password: String,
    /// The starting balance for the user's ledger, zero when omitted.
    #[serde(default)]
    pub balance: Option<f64>,
}

/// A route handler for creating a new user account.
///
/// Responds with `201 Created` and the created user. Credential material is
/// not part of the response.
///
/// # Errors
///
/// This function will return an error in the following situations.
/// - The request body is missing or malformed JSON.
/// - The name, email, or password is blank, or the email is not a valid
///   address.
/// - The password does not meet the complexity policy.
/// - The normalized email address is already registered.
pub async fn register_user<M, T, U>(
    State(mut state): State<AppState<M, T, U>>,
    payload: Result<Json<RegisterData>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), Error>
where
    M: Mailer + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let register_data = parse_json(payload)?;

    if register_data.name.trim().is_empty() {
        return Err(Error::InvalidField("name is required".to_string()));
    }

    if register_data.password.trim().is_empty() {
        return Err(Error::InvalidField("password is required".to_string()));
    }

    let email = normalize_email(&register_data.email)?;
    let password_hash =
        PasswordHash::from_raw_password(&register_data.password, PasswordHash::DEFAULT_COST)?;

    let user = state.user_store.create(NewUser {
        name: register_data.name,
        email,
        password_hash,
        balance: register_data.balance.unwrap_or(0.0),
    })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}
