//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transaction/{transaction_id}',
//! use [format_endpoint].

/// The route for registering a new user.
pub const REGISTER: &str = "/api/user/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/user/login";
/// The route for fetching the logged in user's dashboard.
pub const DASHBOARD: &str = "/api/user/dashboard";
/// The route for requesting a password reset code.
pub const FORGOT_PASSWORD: &str = "/api/user/forgot-password";
/// The route for resetting a password with a reset code.
pub const RESET_PASSWORD: &str = "/api/user/reset-password";
/// The route for recording an income transaction.
pub const ADD_INCOME: &str = "/api/transaction/add-income";
/// The route for recording an expense transaction.
pub const ADD_EXPENSE: &str = "/api/transaction/add-expense";
/// The route for listing the logged in user's transactions.
pub const TRANSACTIONS: &str = "/api/transaction";
/// The route for deleting a single transaction.
pub const DELETE_TRANSACTION: &str = "/api/transaction/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/transaction/{transaction_id}',
/// '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know router registration and
// `Uri::from_shared` will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::REGISTER);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD);
        assert_endpoint_is_valid_uri(endpoints::FORGOT_PASSWORD);
        assert_endpoint_is_valid_uri(endpoints::RESET_PASSWORD);
        assert_endpoint_is_valid_uri(endpoints::ADD_INCOME);
        assert_endpoint_is_valid_uri(endpoints::ADD_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::DELETE_TRANSACTION);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint(endpoints::DELETE_TRANSACTION, 1);

        assert_eq!(formatted_path, "/api/transaction/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint(endpoints::TRANSACTIONS, 1);

        assert_eq!(formatted_path, "/api/transaction");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
