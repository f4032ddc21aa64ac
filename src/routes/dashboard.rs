//! The route handler for the logged-in user's dashboard.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    mail::Mailer,
    models::{Transaction, UserID, UserResponse},
    stores::{TransactionQuery, TransactionStore, UserStore},
};

/// The response body for the dashboard endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// The logged-in user.
    pub user: UserResponse,
    /// The user's most recent transactions, newest first.
    pub transactions: Vec<Transaction>,
}

/// A route handler for fetching an overview of the logged-in user's data.
///
/// Responds with the user's details, including their current balance, and
/// one default page's worth of their most recent transactions, newest first.
///
/// # Errors
///
/// This function will return an error in the following situations.
/// - The user the session token was issued to no longer exists.
/// - There was an error fetching data from the underlying store.
pub async fn get_dashboard<M, T, U>(
    State(state): State<AppState<M, T, U>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<DashboardResponse>, Error>
where
    M: Mailer + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = state.user_store.get(user_id)?;

    let transaction_page = state.transaction_store.get_page(TransactionQuery {
        user_id,
        transaction_type: None,
        page: state.pagination_config.default_page,
        limit: state.pagination_config.default_page_size,
    })?;

    Ok(Json(DashboardResponse {
        user: UserResponse::from(&user),
        transactions: transaction_page.transactions,
    }))
}
