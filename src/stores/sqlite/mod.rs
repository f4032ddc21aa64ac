//! Contains implementations of the store traits backed by SQLite, and a
//! convenience function for building an [AppState] that uses them.

pub mod transaction;
pub mod user;

pub use transaction::SQLiteTransactionStore;
pub use user::SQLiteUserStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize, mail::Mailer, pagination::PaginationConfig};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState<M> = AppState<M, SQLiteTransactionStore, SQLiteUserStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
pub fn create_app_state<M>(
    db_connection: Connection,
    secret: &str,
    pagination_config: PaginationConfig,
    mailer: M,
) -> Result<SQLAppState<M>, Error>
where
    M: Mailer + Clone + Send + Sync,
{
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));
    let user_store = SQLiteUserStore::new(connection.clone());
    let transaction_store = SQLiteTransactionStore::new(connection.clone());

    Ok(AppState::new(
        secret,
        pagination_config,
        mailer,
        user_store,
        transaction_store,
    ))
}
