//! Implements a SQLite backed user store.
use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{NewUser, PasswordHash, ResetCodeHash, User, UserID},
    stores::UserStore,
};

/// Handles the creation and retrieval of User objects.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Errors
    ///
    /// Returns a [Error::DuplicateEmail] if the email address is already registered,
    /// a [Error::DatabaseLockError] if the database lock could not be acquired, or a
    /// [Error::SqlError] if an SQL related error occurred.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error> {
        let created_at = OffsetDateTime::now_utc();
        let connection = self
            .connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        connection.execute(
            "INSERT INTO user (name, email, password, balance, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &new_user.name,
                &new_user.email.to_string(),
                new_user.password_hash.to_string(),
                new_user.balance,
                created_at,
            ),
        )?;

        let id = UserID::new(connection.last_insert_rowid());

        Ok(User::new(
            id,
            new_user.name,
            new_user.email,
            new_user.password_hash,
            new_user.balance,
            None,
            None,
            created_at,
        ))
    }

    /// Get the user from the database that has the specified `id`, or return [Error::NotFound] if such user does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] error if there is no user with the specified ID,
    /// a [Error::DatabaseLockError] if the database lock could not be acquired, or
    /// [Error::SqlError] if there are SQL related errors.
    fn get(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT id, name, email, password, balance, reset_code, reset_code_expires_at, created_at
                 FROM user WHERE id = :id",
            )?
            .query_row(&[(":id", &id.as_i64())], SQLiteUserStore::map_row)
            .map_err(|e| e.into())
    }

    /// Get the user from the database that has the specified `email` address, or return [Error::NotFound] if such user does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] error if there is no user with the specified email,
    /// a [Error::DatabaseLockError] if the database lock could not be acquired, or
    /// [Error::SqlError] if there are SQL related errors.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT id, name, email, password, balance, reset_code, reset_code_expires_at, created_at
                 FROM user WHERE email = :email",
            )?
            .query_row(&[(":email", &email.to_string())], SQLiteUserStore::map_row)
            .map_err(|e| e.into())
    }

    /// Store the hash of a pending password reset code and when it expires.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] error if there is no user with the specified ID,
    /// a [Error::DatabaseLockError] if the database lock could not be acquired, or
    /// [Error::SqlError] if there are SQL related errors.
    fn set_reset_code(
        &mut self,
        user_id: UserID,
        code_hash: ResetCodeHash,
        expires_at: OffsetDateTime,
    ) -> Result<(), Error> {
        let connection = self
            .connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let rows_updated = connection.execute(
            "UPDATE user SET reset_code = ?1, reset_code_expires_at = ?2 WHERE id = ?3",
            (code_hash.to_string(), expires_at, user_id.as_i64()),
        )?;

        if rows_updated == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Replace the user's password hash and clear any pending reset code.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] error if there is no user with the specified ID,
    /// a [Error::DatabaseLockError] if the database lock could not be acquired, or
    /// [Error::SqlError] if there are SQL related errors.
    fn update_password(
        &mut self,
        user_id: UserID,
        password_hash: PasswordHash,
    ) -> Result<(), Error> {
        let connection = self
            .connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let rows_updated = connection.execute(
            "UPDATE user SET password = ?1, reset_code = NULL, reset_code_expires_at = NULL
             WHERE id = ?2",
            (password_hash.to_string(), user_id.as_i64()),
        )?;

        if rows_updated == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    password TEXT NOT NULL,
                    balance REAL NOT NULL DEFAULT 0,
                    reset_code TEXT,
                    reset_code_expires_at TEXT,
                    created_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;
        let name: String = row.get(offset + 1)?;
        let raw_email: String = row.get(offset + 2)?;
        let raw_password_hash: String = row.get(offset + 3)?;
        let balance = row.get(offset + 4)?;
        let raw_reset_code_hash: Option<String> = row.get(offset + 5)?;
        let reset_code_expires_at: Option<OffsetDateTime> = row.get(offset + 6)?;
        let created_at: OffsetDateTime = row.get(offset + 7)?;

        let id = UserID::new(raw_id);
        let email = EmailAddress::new_unchecked(raw_email);
        let password_hash = PasswordHash::new_unchecked(&raw_password_hash);
        let reset_code_hash =
            raw_reset_code_hash.map(|raw_hash| ResetCodeHash::new_unchecked(&raw_hash));

        Ok(User::new(
            id,
            name,
            email,
            password_hash,
            balance,
            reset_code_hash,
            reset_code_expires_at,
            created_at,
        ))
    }
}

#[cfg(test)]
mod user_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        db::CreateTable,
        models::{NewUser, PasswordHash, ResetCodeHash, UserID},
    };

    use super::{Error, SQLiteUserStore, UserStore};

    fn get_store() -> SQLiteUserStore {
        let conn = Connection::open_in_memory().unwrap();
        SQLiteUserStore::create_table(&conn).unwrap();

        SQLiteUserStore::new(Arc::new(Mutex::new(conn)))
    }

    fn new_user(email: &str, password_hash: &str) -> NewUser {
        NewUser {
            name: "Test User".to_string(),
            email: EmailAddress::from_str(email).unwrap(),
            password_hash: PasswordHash::new_unchecked(password_hash),
            balance: 0.0,
        }
    }

    #[test]
    fn insert_user_succeeds() {
        let mut store = get_store();

        let email = EmailAddress::from_str("hello@world.com").unwrap();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user = store.create(new_user("hello@world.com", "hunter2")).unwrap();

        assert!(inserted_user.id().as_i64() > 0);
        assert_eq!(inserted_user.email(), &email);
        assert_eq!(inserted_user.password_hash(), &password_hash);
        assert_eq!(inserted_user.balance(), 0.0);
        assert_eq!(inserted_user.reset_code_hash(), None);
    }

    #[test]
    fn insert_user_fails_on_duplicate_email() {
        let mut store = get_store();

        assert!(store.create(new_user("hello@world.com", "hunter2")).is_ok());

        assert_eq!(
            store.create(new_user("hello@world.com", "hunter3")),
            Err(Error::DuplicateEmail)
        );
    }

    #[test]
    fn insert_user_stores_starting_balance() {
        let mut store = get_store();

        let user = store
            .create(NewUser {
                balance: 123.45,
                ..new_user("hello@world.com", "hunter2")
            })
            .unwrap();

        assert_eq!(user.balance(), 123.45);
        assert_eq!(store.get(user.id()).unwrap().balance(), 123.45);
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let store = get_store();

        let id = UserID::new(42);

        assert_eq!(store.get(id), Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_id() {
        let mut store = get_store();

        let test_user = store.create(new_user("foo@bar.baz", "hunter2")).unwrap();

        let retrieved_user = store.get(test_user.id()).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn get_user_fails_with_non_existent_email() {
        let store = get_store();

        // This email is not in the database.
        let email = EmailAddress::from_str("notavalidemail@foo.bar").unwrap();

        assert_eq!(store.get_by_email(&email), Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_email() {
        let mut store = get_store();
        let test_user = store.create(new_user("foo@bar.baz", "hunter2")).unwrap();

        let retrieved_user = store.get_by_email(test_user.email()).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn set_reset_code_stores_hash_and_expiry() {
        let mut store = get_store();
        let test_user = store.create(new_user("foo@bar.baz", "hunter2")).unwrap();

        let code_hash = ResetCodeHash::new_unchecked("fakehash");
        let expires_at = OffsetDateTime::now_utc() + Duration::hours(1);

        store
            .set_reset_code(test_user.id(), code_hash.clone(), expires_at)
            .unwrap();

        let retrieved_user = store.get(test_user.id()).unwrap();
        assert_eq!(retrieved_user.reset_code_hash(), Some(&code_hash));
        assert_eq!(retrieved_user.reset_code_expires_at(), Some(expires_at));
    }

    #[test]
    fn set_reset_code_fails_with_non_existent_id() {
        let mut store = get_store();

        let result = store.set_reset_code(
            UserID::new(42),
            ResetCodeHash::new_unchecked("fakehash"),
            OffsetDateTime::now_utc(),
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn update_password_replaces_hash_and_clears_reset_code() {
        let mut store = get_store();
        let test_user = store.create(new_user("foo@bar.baz", "hunter2")).unwrap();

        store
            .set_reset_code(
                test_user.id(),
                ResetCodeHash::new_unchecked("fakehash"),
                OffsetDateTime::now_utc() + Duration::hours(1),
            )
            .unwrap();

        let new_password_hash = PasswordHash::new_unchecked("hunter3");
        store
            .update_password(test_user.id(), new_password_hash.clone())
            .unwrap();

        let retrieved_user = store.get(test_user.id()).unwrap();
        assert_eq!(retrieved_user.password_hash(), &new_password_hash);
        assert_eq!(retrieved_user.reset_code_hash(), None);
        assert_eq!(retrieved_user.reset_code_expires_at(), None);
    }

    #[test]
    fn update_password_fails_with_non_existent_id() {
        let mut store = get_store();

        let result = store.update_password(UserID::new(42), PasswordHash::new_unchecked("hunter3"));

        assert_eq!(result, Err(Error::NotFound));
    }
}
