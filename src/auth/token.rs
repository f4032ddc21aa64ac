//! Creating and verifying the JSON Web Tokens used as session tokens.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, models::UserID};

/// How long a session token stays valid after it is issued.
pub const TOKEN_DURATION: Duration = Duration::hours(24);

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: i64,
    /// The time the token was issued, as a unix timestamp.
    pub iat: i64,
    /// The expiry time of the token, as a unix timestamp.
    pub exp: i64,
}

/// Create a signed session token for `user_id` that expires after
/// [TOKEN_DURATION].
///
/// # Errors
///
/// Returns an [Error::TokenCreationError] if the token could not be signed.
pub fn encode_token(user_id: UserID, encoding_key: &EncodingKey) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id.as_i64(),
        iat: now.unix_timestamp(),
        exp: (now + TOKEN_DURATION).unix_timestamp(),
    };

    encode(&Header::default(), &claims, encoding_key)
        .map_err(|error| Error::TokenCreationError(error.to_string()))
}

/// Verify a session token's signature and expiry, and return the ID of the
/// user it was issued to.
///
/// # Errors
///
/// Returns an [Error::InvalidToken] if the token is malformed, was signed
/// with a different key, or has expired.
pub fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<UserID, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|token_data| UserID::new(token_data.claims.sub))
        .map_err(|_| Error::InvalidToken)
}
