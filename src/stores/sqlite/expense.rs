//! Implements a SQLite backed expense store.
use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Expense, ExpenseCategory, ExpenseUpdate, NewExpense},
    stores::ExpenseStore,
};

/// Stores expenses in a SQLite database.
///
/// Note that because an expense depends on the
/// [MonthlyExpense](crate::models::MonthlyExpense) model, that model must be set up in the
/// database.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    /// Create a new expense in the database.
    ///
    /// Sets the created and updated timestamps to the current time.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidForeignKey] if `monthly_expense_id` does not refer to a valid monthly
    ///   expense budget,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, new_expense: NewExpense) -> Result<Expense, Error> {
        let now = OffsetDateTime::now_utc();
        let connection = self.connection.lock().unwrap();

        let expense = connection
            .prepare(
                "INSERT INTO expense (description, category, amount, date, monthly_expense_id, created_at, updated_at, deleted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 RETURNING id, description, category, amount, date, monthly_expense_id, created_at, updated_at, deleted_at",
            )?
            .query_row(
                (
                    new_expense.description(),
                    new_expense.category().as_str(),
                    new_expense.amount(),
                    new_expense.date(),
                    new_expense.monthly_expense_id(),
                    now,
                    now,
                    None::<OffsetDateTime>,
                ),
                Self::map_row,
            )?;

        Ok(expense)
    }

    /// Apply a partial update to the expense with the ID `id`.
    ///
    /// Fields not present in `update` keep their stored values. The updated timestamp is set to
    /// the current time, the created timestamp is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingExpense] if no expense with the given ID exists,
    /// - [Error::InvalidForeignKey] if the update refers to a monthly expense budget that does
    ///   not exist,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, id: DatabaseID, update: ExpenseUpdate) -> Result<Expense, Error> {
        let connection = self.connection.lock().unwrap();

        let expense = connection
            .prepare(
                "SELECT id, description, category, amount, date, monthly_expense_id, created_at, updated_at, deleted_at
                 FROM expense WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], Self::map_row)
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingExpense,
                error => error.into(),
            })?;

        let data = NewExpense::new(
            update
                .description()
                .unwrap_or(expense.description())
                .to_string(),
            update.category().unwrap_or(expense.category()),
            update.amount().unwrap_or(expense.amount()),
            update.date().unwrap_or(expense.date()),
            update
                .monthly_expense_id()
                .unwrap_or(expense.monthly_expense_id()),
        )?;

        let updated_expense = connection
            .prepare(
                "UPDATE expense SET description = ?1, category = ?2, amount = ?3, date = ?4, monthly_expense_id = ?5, updated_at = ?6
                 WHERE id = ?7
                 RETURNING id, description, category, amount, date, monthly_expense_id, created_at, updated_at, deleted_at",
            )?
            .query_row(
                (
                    data.description(),
                    data.category().as_str(),
                    data.amount(),
                    data.date(),
                    data.monthly_expense_id(),
                    OffsetDateTime::now_utc(),
                    id,
                ),
                Self::map_row,
            )?;

        Ok(updated_expense)
    }

    /// Delete the expense with the ID `id` from the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingExpense] if no expense with the given ID exists,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM expense WHERE id = ?1", [id])?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingExpense);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteExpenseStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS expense (
                    id INTEGER PRIMARY KEY,
                    description TEXT NOT NULL,
                    category TEXT NOT NULL,
                    amount REAL NOT NULL,
                    date TEXT NOT NULL,
                    monthly_expense_id INTEGER NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    deleted_at TEXT,
                    FOREIGN KEY(monthly_expense_id) REFERENCES monthly_expense(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteExpenseStore {
    type ReturnType = Expense;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let description: String = row.get(offset + 1)?;
        let raw_category: String = row.get(offset + 2)?;
        let amount = row.get(offset + 3)?;
        let date = row.get(offset + 4)?;
        let monthly_expense_id = row.get(offset + 5)?;
        let created_at = row.get(offset + 6)?;
        let updated_at = row.get(offset + 7)?;
        let deleted_at = row.get(offset + 8)?;

        let category = ExpenseCategory::from_str(&raw_category).map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                offset + 2,
                rusqlite::types::Type::Text,
                Box::new(rusqlite::types::FromSqlError::InvalidType),
            )
        })?;

        // The amount was validated before it was stored, so validation can be skipped here.
        let data =
            NewExpense::new_unchecked(description, category, amount, date, monthly_expense_id);

        Ok(Expense::new(id, data, created_at, updated_at, deleted_at))
    }
}
