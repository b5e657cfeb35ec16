//! Implements a SQLite backed user store.
use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Mobile, NewUser, PasswordHash, User, UserID},
    stores::UserStore,
};

/// Stores users in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Insert a new user into the database.
    ///
    /// Sets the created and updated timestamps to the current time.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns a [Error::DuplicateEmail] if a user with the same email already exists, or a
    /// [Error::SqlError] if an SQL related error occurred.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error> {
        let now = OffsetDateTime::now_utc();
        let connection = self.connection.lock().unwrap();

        let user = connection
            .prepare(
                "INSERT INTO user (first_name, last_name, mobile, email, password, auth_id, created_at, updated_at, deleted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 RETURNING id, first_name, last_name, mobile, email, password, auth_id, created_at, updated_at, deleted_at",
            )?
            .query_row(
                (
                    new_user.first_name.as_deref(),
                    new_user.last_name.as_deref(),
                    new_user.mobile.as_ref(),
                    new_user.email.to_string(),
                    new_user.password_hash.to_string(),
                    new_user.auth_id.as_deref(),
                    now,
                    now,
                    None::<OffsetDateTime>,
                ),
                Self::map_row,
            )?;

        Ok(user)
    }

    /// Look up the user registered with the given `email` address.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] if no user is registered with `email`, or a [Error::SqlError]
    /// if an SQL related error occurred.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, first_name, last_name, mobile, email, password, auth_id, created_at, updated_at, deleted_at
                 FROM user WHERE email = :email",
            )?
            .query_row(&[(":email", &email.to_string())], Self::map_row)
            .map_err(|e| e.into())
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    first_name TEXT,
                    last_name TEXT,
                    mobile TEXT NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    password TEXT UNIQUE NOT NULL,
                    auth_id TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    deleted_at TEXT
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
        let first_name = row.get(offset + 1)?;
        let last_name = row.get(offset + 2)?;
        let raw_mobile: String = row.get(offset + 3)?;
        let raw_email: String = row.get(offset + 4)?;
        let raw_password_hash: String = row.get(offset + 5)?;
        let auth_id = row.get(offset + 6)?;
        let created_at = row.get(offset + 7)?;
        let updated_at = row.get(offset + 8)?;
        let deleted_at = row.get(offset + 9)?;

        let data = NewUser {
            first_name,
            last_name,
            mobile: Mobile::new_unchecked(&raw_mobile),
            email: EmailAddress::new_unchecked(raw_email),
            password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            auth_id,
        };

        Ok(User::new(
            UserID::new(raw_id),
            data,
            created_at,
            updated_at,
            deleted_at,
        ))
    }
}

#[cfg(test)]
mod sqlite_user_store_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{
        db::CreateTable,
        models::{Mobile, NewUser, PasswordHash},
    };

    use super::{Error, SQLiteUserStore, UserStore};

    fn get_store() -> SQLiteUserStore {
        let conn = Connection::open_in_memory().unwrap();
        SQLiteUserStore::create_table(&conn).unwrap();

        SQLiteUserStore::new(Arc::new(Mutex::new(conn)))
    }

    fn get_test_user_data() -> NewUser {
        NewUser {
            first_name: Some("Alice".to_string()),
            last_name: Some("Zhang".to_string()),
            mobile: Mobile::new_unchecked("021 123 4567"),
            email: EmailAddress::from_str("hello@world.com").unwrap(),
            password_hash: PasswordHash::new_unchecked("hunter2"),
            auth_id: Some("local|hello@world.com".to_string()),
        }
    }

    #[test]
    fn create_succeeds() {
        let mut store = get_store();
        let data = get_test_user_data();

        let inserted_user = store.create(data.clone()).unwrap();

        assert!(inserted_user.id().as_i64() > 0);
        assert_eq!(inserted_user.first_name(), data.first_name.as_deref());
        assert_eq!(inserted_user.last_name(), data.last_name.as_deref());
        assert_eq!(inserted_user.mobile(), &data.mobile);
        assert_eq!(inserted_user.email(), &data.email);
        assert_eq!(inserted_user.password_hash(), &data.password_hash);
        assert_eq!(inserted_user.auth_id(), data.auth_id.as_deref());
        assert_eq!(inserted_user.created_at(), inserted_user.updated_at());
        assert_eq!(inserted_user.deleted_at(), None);
    }

    #[test]
    fn create_succeeds_without_optional_fields() {
        let mut store = get_store();
        let data = NewUser {
            first_name: None,
            last_name: None,
            auth_id: None,
            ..get_test_user_data()
        };

        let inserted_user = store.create(data).unwrap();

        assert_eq!(inserted_user.first_name(), None);
        assert_eq!(inserted_user.last_name(), None);
        assert_eq!(inserted_user.auth_id(), None);
    }

    #[test]
    fn create_fails_on_duplicate_email() {
        let mut store = get_store();

        assert!(store.create(get_test_user_data()).is_ok());

        let duplicate = NewUser {
            password_hash: PasswordHash::new_unchecked("hunter3"),
            ..get_test_user_data()
        };

        assert_eq!(store.create(duplicate), Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_by_email_fails_on_missing_email() {
        let store = get_store();

        // No user with this email was inserted.
        let email = EmailAddress::from_str("nobody@missing.example").unwrap();

        assert_eq!(store.get_by_email(&email), Err(Error::NotFound));
    }

    #[test]
    fn get_by_email_succeeds() {
        let mut store = get_store();
        let test_user = store.create(get_test_user_data()).unwrap();

        let retrieved_user = store.get_by_email(test_user.email()).unwrap();

        assert_eq!(retrieved_user, test_user);
    }
}
