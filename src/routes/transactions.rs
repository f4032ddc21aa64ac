//! The route handlers for recording, listing, and deleting transactions.

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::{JsonRejection, PathRejection, QueryRejection}},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    mail::Mailer,
    models::{DatabaseID, NewTransaction, Transaction, TransactionType, UserID},
    routes::{parse_json, parse_path, parse_query},
    stores::{TransactionPage, TransactionQuery, TransactionStore, UserStore},
};

/// The request body for recording a new transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionData {
    /// The amount of money spent or earned, must be greater than zero.
    pub amount: f64,
    /// A note on what the transaction was for.
    pub description: String,
}

/// The query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct TransactionListParams {
    /// Restricts the list to `"income"` or `"expense"` transactions. An
    /// absent or empty value means no filter.
    #[serde(default)]
    pub transaction_type: Option<String>,
    /// The 1-based page to fetch, the first page when absent or zero.
    #[serde(default)]
    pub page: Option<u64>,
    /// The number of transactions per page, the default page size when
    /// absent or zero.
    #[serde(default)]
    pub limit: Option<u64>,
}

fn record_transaction<M, T, U>(
    mut state: AppState<M, T, U>,
    user_id: UserID,
    payload: Result<Json<TransactionData>, JsonRejection>,
    transaction_type: TransactionType,
) -> Result<(StatusCode, Json<Transaction>), Error>
where
    M: Mailer + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let transaction_data = parse_json(payload)?;

    let new_transaction = NewTransaction::new(
        user_id,
        transaction_data.amount,
        transaction_type,
        transaction_data.description,
    )?;

    let transaction = state.transaction_store.create(new_transaction)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// A route handler for recording an income transaction.
///
/// Responds with `201 Created` and the recorded transaction. The amount is
/// added to the logged-in user's balance.
///
/// # Errors
///
/// This function will return an error in the following situations.
/// - The request body is missing or malformed JSON.
/// - The amount is not a finite number greater than zero, or the description
///   is blank.
/// - There was an error writing to the underlying store.
pub async fn add_income<M, T, U>(
    State(state): State<AppState<M, T, U>>,
    Extension(user_id): Extension<UserID>,
    payload: Result<Json<TransactionData>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), Error>
where
    M: Mailer + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    record_transaction(state, user_id, payload, TransactionType::Income)
}

/// A route handler for recording an expense transaction.
///
/// Responds with `201 Created` and the recorded transaction. The amount is
/// subtracted from the logged-in user's balance.
///
/// # Errors
///
/// See [add_income], the two handlers differ only in the sign applied to the
/// balance.
pub async fn add_expense<M, T, U>(
    State(state): State<AppState<M, T, U>>,
    Extension(user_id): Extension<UserID>,
    payload: Result<Json<TransactionData>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), Error>
where
    M: Mailer + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    record_transaction(state, user_id, payload, TransactionType::Expense)
}

/// A route handler for listing the logged-in user's transactions.
///
/// Responds with one page of transactions, newest first, along with the
/// total count and page count for building pagination controls.
///
/// # Errors
///
/// This function will return an error in the following situations.
/// - The query string could not be parsed.
/// - The transaction type filter is not `"income"` or `"expense"`.
/// - There was an error fetching data from the underlying store.
pub async fn get_transactions<M, T, U>(
    State(state): State<AppState<M, T, U>>,
    Extension(user_id): Extension<UserID>,
    params: Result<Query<TransactionListParams>, QueryRejection>,
) -> Result<Json<TransactionPage>, Error>
where
    M: Mailer + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let params = parse_query(params)?;

    let transaction_type = params
        .transaction_type
        .as_deref()
        .filter(|value| !value.is_empty())
        .map(str::parse::<TransactionType>)
        .transpose()?;

    let query = TransactionQuery {
        user_id,
        transaction_type,
        page: state.pagination_config.page_or_default(params.page),
        limit: state.pagination_config.limit_or_default(params.limit),
    };

    let transaction_page = state.transaction_store.get_page(query)?;

    Ok(Json(transaction_page))
}

/// A route handler for deleting one of the logged-in user's transactions.
///
/// Responds with the deleted transaction. Its amount is reversed out of the
/// user's balance.
///
/// # Errors
///
/// This function will return an error in the following situations.
/// - The transaction ID in the path is not an integer.
/// - The transaction does not exist or belongs to another user. Both cases
///   produce the same not found error.
pub async fn delete_transaction<M, T, U>(
    State(mut state): State<AppState<M, T, U>>,
    Extension(user_id): Extension<UserID>,
    path: Result<Path<DatabaseID>, PathRejection>,
) -> Result<Json<Transaction>, Error>
where
    M: Mailer + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let transaction_id = parse_path(path)?;

    let transaction = state.transaction_store.delete(user_id, transaction_id)?;

    Ok(Json(transaction))
}
