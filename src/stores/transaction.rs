//! Defines the transaction store trait.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::{DatabaseID, NewTransaction, Transaction, TransactionType, UserID},
};

/// Handles the creation and retrieval of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store and apply its amount to the
    /// owner's balance.
    ///
    /// Implementers must perform both writes atomically, a recorded
    /// transaction without the matching balance change would corrupt the
    /// owner's ledger.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve a page of transactions from the store in the way defined by `query`.
    ///
    /// Transactions are returned newest first.
    fn get_page(&self, query: TransactionQuery) -> Result<TransactionPage, Error>;

    /// Delete a transaction owned by `user_id` and reverse its effect on
    /// their balance, returning the deleted transaction.
    ///
    /// Implementers must return [Error::NotFound] if the transaction does not
    /// exist or belongs to another user, without revealing which of the two
    /// was the case.
    fn delete(&mut self, user_id: UserID, transaction_id: DatabaseID)
    -> Result<Transaction, Error>;
}

/// Defines which transactions should be fetched from [TransactionStore::get_page].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Include only transactions belonging to this user.
    pub user_id: UserID,
    /// Include only transactions of this type. `None` includes both incomes
    /// and expenses.
    pub transaction_type: Option<TransactionType>,
    /// The page to fetch, starting from one.
    pub page: u64,
    /// The maximum number of transactions per page, at least one.
    pub limit: u64,
}

/// A single page of a user's transactions along with the information needed
/// to render pagination controls.
///
/// This type doubles as the response body of the transaction list endpoint,
/// so it serializes with the field names clients see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPage {
    /// The transactions on this page, newest first.
    pub transactions: Vec<Transaction>,
    /// How many transactions matched the query across all pages.
    pub total_transactions: u64,
    /// The page that was fetched.
    pub current_page: u64,
    /// How many pages the matching transactions span.
    pub total_pages: u64,
}
