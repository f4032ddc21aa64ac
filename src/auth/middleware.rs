//! Authentication middleware that validates bearer tokens on protected routes.

use axum::{
    RequestPartsExt,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::DecodingKey;

use crate::{Error, auth::token::decode_token};

/// The state needed for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    /// The key used for verifying session tokens.
    pub decoding_key: DecodingKey,
}

/// Middleware function that checks for a valid bearer token in the
/// `Authorization` header.
/// The user ID is placed into the request and then the request executed
/// normally if the token is valid, otherwise a `401 Unauthorized` response is
/// returned and the route handler never runs.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Result<Response, Error> {
    let (mut parts, body) = request.into_parts();

    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| Error::InvalidToken)?;

    let user_id = decode_token(bearer.token(), &state.decoding_key)?;

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{Extension, Router, middleware, routing::get};
    use axum_test::TestServer;
    use jsonwebtoken::{DecodingKey, EncodingKey};

    use crate::{auth::encode_token, models::UserID};

    use super::{AuthState, auth_guard};

    async fn protected_handler(Extension(user_id): Extension<UserID>) -> String {
        user_id.to_string()
    }

    fn get_server() -> TestServer {
        let state = AuthState {
            decoding_key: DecodingKey::from_secret("foobar".as_bytes()),
        };

        let app = Router::new()
            .route("/protected", get(protected_handler))
            .layer(middleware::from_fn_with_state(state, auth_guard));

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn request_with_valid_token_reaches_the_handler() {
        let server = get_server();
        let token = encode_token(
            UserID::new(7),
            &EncodingKey::from_secret("foobar".as_bytes()),
        )
        .unwrap();

        let response = server.get("/protected").authorization_bearer(token).await;

        response.assert_status_ok();
        response.assert_text("7");
    }

    #[tokio::test]
    async fn request_with_missing_header_is_unauthorized() {
        let server = get_server();

        let response = server.get("/protected").await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn request_with_garbage_token_is_unauthorized() {
        let server = get_server();

        let response = server
            .get("/protected")
            .authorization_bearer("definitely.not.ajwt")
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn request_with_token_from_another_secret_is_unauthorized() {
        let server = get_server();
        let token = encode_token(
            UserID::new(7),
            &EncodingKey::from_secret("someothersecret".as_bytes()),
        )
        .unwrap();

        let response = server.get("/protected").authorization_bearer(token).await;

        response.assert_status_unauthorized();
    }
}
