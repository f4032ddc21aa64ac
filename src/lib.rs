//! Ledgerly is a backend API for tracking personal income and expenses.
//!
//! This library provides a JSON REST API with bearer-token authentication,
//! a transaction ledger that maintains a running balance per user, and an
//! email based password reset flow.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod db;
mod endpoints;
mod logging;
mod mail;
mod models;
mod pagination;
mod routes;
mod routing;
mod stores;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use mail::{Mailer, TracingMailer};
pub use models::UserID;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use stores::sqlite::{SQLAppState, SQLiteTransactionStore, SQLiteUserStore, create_app_state};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A request field was missing, empty, or failed validation.
    ///
    /// The string is a human-readable message describing which field was
    /// rejected and why. It is safe to show to the client.
    #[error("{0}")]
    InvalidField(String),

    /// The user provided a password that does not meet the complexity policy.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The email address is already registered.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The user provided the wrong password at login.
    #[error("incorrect password")]
    InvalidCredentials,

    /// The request had a missing, malformed, or expired session token.
    #[error("invalid or expired session token")]
    InvalidToken,

    /// The reset code did not match the one on record, or none was pending.
    #[error("the reset code is incorrect")]
    InvalidResetCode,

    /// The reset code on record has passed its expiration time.
    #[error("the reset code has expired, request a new one")]
    ExpiredResetCode,

    /// The mail collaborator could not deliver an email.
    #[error("could not deliver the reset email: {0}")]
    EmailDeliveryError(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The session token could not be signed.
    #[error("could not create the session token: {0}")]
    TokenCreationError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::InvalidField(_)
            | Error::TooWeak(_)
            | Error::DuplicateEmail
            | Error::InvalidResetCode
            | Error::ExpiredResetCode => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidCredentials | Error::InvalidToken => StatusCode::UNAUTHORIZED,
            Error::EmailDeliveryError(_)
            | Error::HashingError(_)
            | Error::TokenCreationError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError => {
                tracing::error!("An unexpected error occurred: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
