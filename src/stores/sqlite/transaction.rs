//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, NewTransaction, Transaction, TransactionType, UserID},
    stores::{TransactionPage, TransactionQuery, TransactionStore},
};

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction belongs to a [User](crate::models::User)
/// and updates their balance, the user model must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database and apply its amount to the
    /// owner's balance.
    ///
    /// Both writes happen in a single SQL transaction, so the ledger and the
    /// balance cannot drift apart.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if the owner does not refer to a valid user,
    /// - [Error::DatabaseLockError] if the database lock could not be acquired,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let created_at = OffsetDateTime::now_utc();
        let signed_amount =
            new_transaction.amount() * new_transaction.transaction_type().balance_sign();

        let connection = self
            .connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;
        let sql_transaction = connection.unchecked_transaction()?;

        let rows_updated = sql_transaction.execute(
            "UPDATE user SET balance = balance + ?1 WHERE id = ?2",
            (signed_amount, new_transaction.user_id().as_i64()),
        )?;

        if rows_updated == 0 {
            return Err(Error::NotFound);
        }

        let transaction = sql_transaction
            .prepare(
                "INSERT INTO \"transaction\" (user_id, amount, transaction_type, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id, user_id, amount, transaction_type, description, created_at",
            )?
            .query_row(
                (
                    new_transaction.user_id().as_i64(),
                    new_transaction.amount(),
                    new_transaction.transaction_type().as_str(),
                    new_transaction.description(),
                    created_at,
                ),
                Self::map_row,
            )?;

        sql_transaction.commit()?;

        Ok(transaction)
    }

    /// Query for a page of the user's transactions in the database, newest
    /// first.
    ///
    /// # Errors
    /// This function will return a [Error::DatabaseLockError] if the database
    /// lock could not be acquired, or a [Error::SqlError] if there is a SQL
    /// error.
    fn get_page(&self, query: TransactionQuery) -> Result<TransactionPage, Error> {
        let mut where_clause_parts = vec!["user_id = ?1".to_string()];
        let mut query_parameters = vec![Value::Integer(query.user_id.as_i64())];

        if let Some(transaction_type) = query.transaction_type {
            where_clause_parts.push(format!(
                "transaction_type = ?{}",
                query_parameters.len() + 1
            ));
            query_parameters.push(Value::Text(transaction_type.to_string()));
        }

        let where_clause = where_clause_parts.join(" AND ");

        let connection = self
            .connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let total_transactions = connection
            .prepare(&format!(
                "SELECT COUNT(id) FROM \"transaction\" WHERE {where_clause}"
            ))?
            .query_row(params_from_iter(query_parameters.iter()), |row| {
                row.get::<_, i64>(0)
            })? as u64;

        let offset = query.page.saturating_sub(1).saturating_mul(query.limit);
        let query_string = format!(
            "SELECT id, user_id, amount, transaction_type, description, created_at
             FROM \"transaction\"
             WHERE {where_clause}
             ORDER BY created_at DESC, id DESC
             LIMIT {} OFFSET {offset}",
            query.limit
        );

        let transactions = connection
            .prepare(&query_string)?
            .query_map(params_from_iter(query_parameters.iter()), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TransactionPage {
            transactions,
            total_transactions,
            current_page: query.page,
            total_pages: total_transactions.div_ceil(query.limit),
        })
    }

    /// Delete a transaction owned by `user_id` and reverse its effect on
    /// their balance, returning the deleted transaction.
    ///
    /// Both writes happen in a single SQL transaction, so the ledger and the
    /// balance cannot drift apart.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if the transaction does not exist or belongs to
    ///   another user,
    /// - [Error::DatabaseLockError] if the database lock could not be acquired,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(
        &mut self,
        user_id: UserID,
        transaction_id: DatabaseID,
    ) -> Result<Transaction, Error> {
        let connection = self
            .connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;
        let sql_transaction = connection.unchecked_transaction()?;

        let transaction = sql_transaction
            .prepare(
                "SELECT id, user_id, amount, transaction_type, description, created_at
                 FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
            )?
            .query_row(
                &[(":id", &transaction_id), (":user_id", &user_id.as_i64())],
                Self::map_row,
            )?;

        sql_transaction.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1",
            (transaction_id,),
        )?;

        sql_transaction.execute(
            "UPDATE user SET balance = balance - ?1 WHERE id = ?2",
            (
                transaction.amount() * transaction.transaction_type().balance_sign(),
                user_id.as_i64(),
            ),
        )?;

        sql_transaction.commit()?;

        Ok(transaction)
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    amount REAL NOT NULL,
                    transaction_type TEXT NOT NULL,
                    description TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let user_id = UserID::new(row.get(offset + 1)?);
        let amount = row.get(offset + 2)?;
        let raw_transaction_type: String = row.get(offset + 3)?;
        let description = row.get(offset + 4)?;
        let created_at = row.get(offset + 5)?;

        let transaction_type = raw_transaction_type
            .parse::<TransactionType>()
            .map_err(|error| {
                rusqlite::Error::FromSqlConversionFailure(
                    offset + 3,
                    rusqlite::types::Type::Text,
                    Box::new(error),
                )
            })?;

        Ok(Transaction::new_unchecked(
            id,
            user_id,
            amount,
            transaction_type,
            description,
            created_at,
        ))
    }
}
