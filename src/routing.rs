//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::{
    AppState,
    auth::auth_guard,
    endpoints,
    mail::Mailer,
    routes::{
        add_expense, add_income, delete_transaction, forgot_password, get_dashboard,
        get_transactions, log_in, register_user, reset_password,
    },
    stores::{TransactionStore, UserStore},
};

/// Return a router with all the app's routes.
///
/// The account routes (register, log in, and the password reset flow) are
/// reachable without a session token, everything else sits behind the auth
/// middleware.
pub fn build_router<M, T, U>(state: AppState<M, T, U>) -> Router
where
    M: Mailer + Clone + Send + Sync + 'static,
    T: TransactionStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    let unprotected_routes = Router::new()
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(log_in))
        .route(endpoints::FORGOT_PASSWORD, post(forgot_password))
        .route(endpoints::RESET_PASSWORD, post(reset_password));

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard))
        .route(endpoints::ADD_INCOME, post(add_income))
        .route(endpoints::ADD_EXPENSE, post(add_expense))
        .route(endpoints::TRANSACTIONS, get(get_transactions))
        .route(endpoints::DELETE_TRANSACTION, delete(delete_transaction))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes.merge(unprotected_routes).with_state(state)
}

#[cfg(test)]
mod router_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        endpoints::{self, format_endpoint},
        mail::TracingMailer,
        models::Transaction,
        pagination::PaginationConfig,
        routes::{DashboardResponse, LogInResponse},
        routing::build_router,
        stores::sqlite::create_app_state,
    };

    fn get_test_server() -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = create_app_state(
            db_connection,
            "42",
            PaginationConfig::default(),
            TracingMailer,
        )
        .expect("Could not create app state.");

        TestServer::new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn user_can_register_log_in_and_manage_transactions() {
        let server = get_test_server();

        server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "Abcdef1!",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let log_in_response = server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .json(&json!({
                "email": "ada@example.com",
                "password": "Abcdef1!",
            }))
            .await
            .json::<LogInResponse>();
        let token = log_in_response.token;

        let dashboard = server
            .get(endpoints::DASHBOARD)
            .authorization_bearer(&token)
            .await
            .json::<DashboardResponse>();
        assert_eq!(dashboard.user.balance, 0.0);
        assert!(dashboard.transactions.is_empty());

        let transaction = server
            .post(endpoints::ADD_INCOME)
            .authorization_bearer(&token)
            .content_type("application/json")
            .json(&json!({
                "amount": 100.0,
                "description": "wages",
            }))
            .await
            .json::<Transaction>();

        let dashboard = server
            .get(endpoints::DASHBOARD)
            .authorization_bearer(&token)
            .await
            .json::<DashboardResponse>();
        assert_eq!(dashboard.user.balance, 100.0);
        assert_eq!(dashboard.transactions.len(), 1);

        server
            .delete(&format_endpoint(
                endpoints::DELETE_TRANSACTION,
                transaction.id(),
            ))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let dashboard = server
            .get(endpoints::DASHBOARD)
            .authorization_bearer(&token)
            .await
            .json::<DashboardResponse>();
        assert_eq!(dashboard.user.balance, 0.0);
        assert!(dashboard.transactions.is_empty());
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let server = get_test_server();

        server
            .get(endpoints::DASHBOARD)
            .await
            .assert_status_unauthorized();
        server
            .post(endpoints::ADD_INCOME)
            .await
            .assert_status_unauthorized();
        server
            .post(endpoints::ADD_EXPENSE)
            .await
            .assert_status_unauthorized();
        server
            .get(endpoints::TRANSACTIONS)
            .await
            .assert_status_unauthorized();
        server
            .delete(&format_endpoint(endpoints::DELETE_TRANSACTION, 1))
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn unknown_route_returns_not_found() {
        let server = get_test_server();

        server
            .get("/api/user/profile")
            .await
            .assert_status_not_found();
    }
}
