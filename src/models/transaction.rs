//! This file defines transactions, the line items that make up a user's ledger.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// Whether a transaction adds to or subtracts from a user's balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, increases the user's balance.
    Income,
    /// Money going out, decreases the user's balance.
    Expense,
}

impl TransactionType {
    /// The lowercase string stored in the database and used in the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// The sign this transaction type applies to a user's balance, `1.0` for
    /// income and `-1.0` for expenses.
    pub fn balance_sign(&self) -> f64 {
        match self {
            TransactionType::Income => 1.0,
            TransactionType::Expense => -1.0,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(Error::InvalidField(format!(
                "transaction type must be 'income' or 'expense', got '{string}'"
            ))),
        }
    }
}

/// The data needed to insert a new transaction into a
/// [TransactionStore](crate::stores::TransactionStore).
///
/// Use [NewTransaction::new] to get an instance whose amount and description
/// have been validated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    user_id: UserID,
    amount: f64,
    transaction_type: TransactionType,
    description: String,
}

impl NewTransaction {
    /// Create a validated transaction to insert into a store.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidField] if `amount` is not a finite number
    /// greater than zero, or if `description` is blank.
    pub fn new(
        user_id: UserID,
        amount: f64,
        transaction_type: TransactionType,
        description: String,
    ) -> Result<Self, Error> {
        if description.trim().is_empty() {
            return Err(Error::InvalidField("description is required".to_string()));
        }

        if !amount.is_finite() {
            return Err(Error::InvalidField(
                "amount must be a finite number".to_string(),
            ));
        }

        if amount <= 0.0 {
            return Err(Error::InvalidField(
                "amount must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            user_id,
            amount,
            transaction_type,
            description,
        })
    }

    /// The ID of the user the transaction belongs to.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// The amount of money spent or earned, always greater than zero.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Whether the transaction is income or an expense.
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// A note on what the transaction was for.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A transaction that has been recorded in a user's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: DatabaseID,
    user_id: UserID,
    amount: f64,
    transaction_type: TransactionType,
    description: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a transaction from its stored fields.
    ///
    /// The caller must ensure that `id` refers to a database row whose
    /// columns match the other fields. This function is not `unsafe` in the
    /// Rust sense, the 'unchecked' refers to the values not being validated.
    pub fn new_unchecked(
        id: DatabaseID,
        user_id: UserID,
        amount: f64,
        transaction_type: TransactionType,
        description: String,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            user_id,
            amount,
            transaction_type,
            description,
            created_at,
        }
    }

    /// The transaction's ID in the database.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The ID of the user the transaction belongs to.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// The amount of money spent or earned.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Whether the transaction is income or an expense.
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// A note on what the transaction was for.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// When the transaction was recorded.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

#[cfg(test)]
mod transaction_type_tests {
    use std::str::FromStr;

    use crate::{Error, models::TransactionType};

    #[test]
    fn parses_lowercase_names() {
        assert_eq!(
            TransactionType::from_str("income"),
            Ok(TransactionType::Income)
        );
        assert_eq!(
            TransactionType::from_str("expense"),
            Ok(TransactionType::Expense)
        );
    }

    #[test]
    fn rejects_unknown_names() {
        let result = TransactionType::from_str("transfer");

        assert!(matches!(result, Err(Error::InvalidField(_))));
    }

    #[test]
    fn serializes_as_lowercase() {
        let json = serde_json::to_string(&TransactionType::Income).unwrap();

        assert_eq!(json, "\"income\"");
    }
}
