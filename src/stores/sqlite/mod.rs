//! The SQLite backed store implementations, plus helpers for building an
//! [AppState] on top of them.

pub mod expense;
pub mod monthly_expense;
pub mod user;

pub use expense::SQLiteExpenseStore;
pub use monthly_expense::SQLiteMonthlyExpenseStore;
pub use user::SQLiteUserStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize};

/// An alias for an [AppState] backed by the SQLite stores.
pub type SQLAppState = AppState<SQLiteExpenseStore, SQLiteMonthlyExpenseStore, SQLiteUserStore>;

/// Create an [AppState] backed by the SQLite stores.
///
/// Adds the tables for the domain models to the database if they are not
/// already there.
pub fn create_app_state(db_connection: Connection, jwt_secret: &str) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));
    let expense_store = SQLiteExpenseStore::new(connection.clone());
    let monthly_expense_store = SQLiteMonthlyExpenseStore::new(connection.clone());
    let user_store = SQLiteUserStore::new(connection);

    Ok(AppState::new(
        jwt_secret,
        expense_store,
        monthly_expense_store,
        user_store,
    ))
}
