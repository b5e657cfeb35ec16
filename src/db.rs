/*! This module defines traits for creating the application's database schema and for reading rows back into model types. */

use rusqlite::{Connection, Row, Transaction as SqlTransaction};

use crate::{
    Error,
    stores::sqlite::{SQLiteExpenseStore, SQLiteMonthlyExpenseStore, SQLiteUserStore},
};

/// A trait for creating the database table that backs a model.
pub trait CreateTable {
    /// Create the table for this model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A trait for converting a `rusqlite::Row` into a concrete rust type.
///
/// # Examples
/// ```
/// use rusqlite::{Connection, Row};
///
/// use budget_tracker_rs::{Error, db::{CreateTable, MapRow}};
///
/// struct Budget {
///     id: i64,
///     goal: f64,
/// }
///
/// impl CreateTable for Budget {
///    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
///        connection.execute(
///            "CREATE TABLE budget (id INTEGER PRIMARY KEY, goal REAL NOT NULL)",
///            (),
///        )?;
///
///        Ok(())
///    }
/// }
///
/// impl MapRow for Budget {
///     type ReturnType = Self;
///
///     fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
///         Ok(Self {
///             id: row.get(offset)?,
///             goal: row.get(offset + 1)?,
///         })
///     }
/// }
///
/// struct LineItem {
///     id: i64,
///     amount: f64,
/// }
///
/// impl CreateTable for LineItem {
///    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
///        connection.execute(
///            "CREATE TABLE line_item (id INTEGER PRIMARY KEY, amount REAL NOT NULL, budget_id INTEGER NOT NULL)",
///            (),
///        )?;
///
///        Ok(())
///    }
/// }
///
/// impl MapRow for LineItem {
///     type ReturnType = Self;
///
///     fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
///         Ok(Self {
///             id: row.get(offset)?,
///             amount: row.get(offset + 1)?,
///         })
///     }
/// }
///
/// fn example(conn: &Connection) -> Result<(Budget, LineItem), Error> {
///     conn.
///         prepare("SELECT l.id, l.goal, r.id, r.amount FROM budget l INNER JOIN line_item r ON l.id = r.budget_id WHERE l.id = :id")?
///         .query_row(&[(":id", &1)], |row| {
///             let budget = Budget::map_row(row)?;
///             let line_item = LineItem::map_row_with_offset(row, 2)?;
///
///             Ok((budget, line_item))
///         })
///         .map_err(|e| e.into())
/// }
/// ```
pub trait MapRow {
    type ReturnType;

    /// Convert a row into this trait's return type, reading from column zero.
    ///
    /// **Note:** the row must contain all the table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a column cannot be converted into the corresponding rust type or an
    /// invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into this trait's return type, reading from the column at `offset`.
    ///
    /// The offset makes it possible to construct two different types from the one row when tables
    /// have been joined.
    ///
    /// **Note:** the row must contain all the table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a column cannot be converted into the corresponding rust type or an
    /// invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// Create the tables for the domain models in the database attached to `connection`.
///
/// Tables that already exist are left untouched.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    SQLiteUserStore::create_table(&transaction)?;
    SQLiteMonthlyExpenseStore::create_table(&transaction)?;
    SQLiteExpenseStore::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
