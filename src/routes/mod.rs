//! This module defines the REST API's route handlers.
//!
//! Each submodule owns one endpoint (or a small family of endpoints) along
//! with its request and response types and tests.

use axum::{
    Json,
    extract::{
        Path, Query,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};

use crate::Error;

mod dashboard;
mod log_in;
mod password_reset;
mod register;
mod transactions;

pub use dashboard::{DashboardResponse, get_dashboard};
pub use log_in::{LogInData, LogInResponse, log_in};
pub use password_reset::{ForgotPasswordData, ResetPasswordData, forgot_password, reset_password};
pub use register::{RegisterData, register_user};
pub use transactions::{
    TransactionData, TransactionListParams, add_expense, add_income, delete_transaction,
    get_transactions,
};

/// Unwrap a JSON request body, converting a missing or malformed body into an
/// [Error::InvalidField] so the client receives the API's JSON error shape
/// rather than axum's plain-text rejection.
fn parse_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Error> {
    match payload {
        Ok(Json(data)) => Ok(data),
        Err(rejection) => Err(Error::InvalidField(rejection.body_text())),
    }
}

/// Unwrap query string parameters, converting a malformed query string into an
/// [Error::InvalidField].
fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, Error> {
    match query {
        Ok(Query(params)) => Ok(params),
        Err(rejection) => Err(Error::InvalidField(rejection.body_text())),
    }
}

/// Unwrap a path parameter, converting a malformed value into an
/// [Error::InvalidField].
fn parse_path<T>(path: Result<Path<T>, PathRejection>) -> Result<T, Error> {
    match path {
        Ok(Path(value)) => Ok(value),
        Err(rejection) => Err(Error::InvalidField(rejection.body_text())),
    }
}
