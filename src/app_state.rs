//! Implements a struct that holds the state of the REST server.

use std::marker::{Send, Sync};

use axum::extract::FromRef;
use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::{
    auth::AuthState,
    mail::Mailer,
    pagination::PaginationConfig,
    stores::{TransactionStore, UserStore},
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState<M, T, U>
where
    M: Mailer + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    /// The key to be used for signing session tokens.
    pub encoding_key: EncodingKey,
    /// The key to be used for verifying session tokens.
    pub decoding_key: DecodingKey,
    /// The config that controls how transaction lists are paged.
    pub pagination_config: PaginationConfig,
    /// The mailer for delivering password reset codes.
    pub mailer: M,
    /// The store for managing [users](crate::models::User).
    pub user_store: U,
    /// The store for managing user [transactions](crate::models::Transaction).
    pub transaction_store: T,
}

impl<M, T, U> AppState<M, T, U>
where
    M: Mailer + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    /// Create a new [AppState].
    ///
    /// `secret` is the key material used for signing and verifying session
    /// tokens.
    pub fn new(
        secret: &str,
        pagination_config: PaginationConfig,
        mailer: M,
        user_store: U,
        transaction_store: T,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            pagination_config,
            mailer,
            user_store,
            transaction_store,
        }
    }
}

// this impl tells the auth middleware how to access the decoding key from our
// state
impl<M, T, U> FromRef<AppState<M, T, U>> for AuthState
where
    M: Mailer + Clone + Send + Sync,
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<M, T, U>) -> Self {
        Self {
            decoding_key: state.decoding_key.clone(),
        }
    }
}
