//! Implements a SQLite backed monthly expense store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{
        DatabaseID, Expense, MonthlyExpense, MonthlyExpenseWithCashOnHand, NewMonthlyExpense,
        UserID,
    },
    stores::{MonthlyExpenseStore, sqlite::SQLiteExpenseStore},
};

/// Stores monthly expense budgets in a SQLite database.
///
/// Note that because a monthly expense budget depends on the [User](crate::models::User) model,
/// that model must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteMonthlyExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteMonthlyExpenseStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl MonthlyExpenseStore for SQLiteMonthlyExpenseStore {
    /// Create a new monthly expense budget in the database.
    ///
    /// Sets the created and updated timestamps to the current time.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidForeignKey] if `user_id` does not refer to a valid user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(
        &mut self,
        new_monthly_expense: NewMonthlyExpense,
        user_id: UserID,
    ) -> Result<MonthlyExpense, Error> {
        let now = OffsetDateTime::now_utc();
        let connection = self.connection.lock().unwrap();

        let monthly_expense = connection
            .prepare(
                "INSERT INTO monthly_expense (month, budget_goal, user_id, created_at, updated_at, deleted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, month, budget_goal, user_id, created_at, updated_at, deleted_at",
            )?
            .query_row(
                (
                    new_monthly_expense.month(),
                    new_monthly_expense.budget_goal(),
                    user_id.as_i64(),
                    now,
                    now,
                    None::<OffsetDateTime>,
                ),
                Self::map_row,
            )?;

        Ok(monthly_expense)
    }

    /// Retrieve the monthly expense budget with `id` belonging to the user `user_id`, along with
    /// its expenses and cash on hand.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no budget matches `id`, or the matching budget belongs to a user
    ///   other than `user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID, user_id: UserID) -> Result<MonthlyExpenseWithCashOnHand, Error> {
        let connection = self.connection.lock().unwrap();

        let monthly_expense = connection
            .prepare(
                "SELECT id, month, budget_goal, user_id, created_at, updated_at, deleted_at
                 FROM monthly_expense WHERE id = :id AND user_id = :user_id",
            )?
            .query_row(
                &[(":id", &id), (":user_id", &user_id.as_i64())],
                Self::map_row,
            )?;

        let expenses = select_expenses(&connection, monthly_expense.id())?;

        Ok(monthly_expense.with_expenses(expenses))
    }

    /// Retrieve every monthly expense budget belonging to the user `user_id`, each with its
    /// expenses and cash on hand, ordered by month.
    ///
    /// An empty vector is returned if the specified user has no budgets.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    fn get_all(&self, user_id: UserID) -> Result<Vec<MonthlyExpenseWithCashOnHand>, Error> {
        let connection = self.connection.lock().unwrap();

        let monthly_expenses = connection
            .prepare(
                "SELECT id, month, budget_goal, user_id, created_at, updated_at, deleted_at
                 FROM monthly_expense WHERE user_id = :user_id ORDER BY month ASC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_monthly_expense| maybe_monthly_expense.map_err(Error::SqlError))
            .collect::<Result<Vec<MonthlyExpense>, Error>>()?;

        monthly_expenses
            .into_iter()
            .map(|monthly_expense| {
                let expenses = select_expenses(&connection, monthly_expense.id())?;

                Ok(monthly_expense.with_expenses(expenses))
            })
            .collect()
    }
}

/// Retrieve the expenses recorded against the budget `monthly_expense_id`.
fn select_expenses(
    connection: &Connection,
    monthly_expense_id: DatabaseID,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, description, category, amount, date, monthly_expense_id, created_at, updated_at, deleted_at
             FROM expense WHERE monthly_expense_id = :monthly_expense_id",
        )?
        .query_map(
            &[(":monthly_expense_id", &monthly_expense_id)],
            SQLiteExpenseStore::map_row,
        )?
        .map(|maybe_expense| maybe_expense.map_err(Error::SqlError))
        .collect()
}

impl CreateTable for SQLiteMonthlyExpenseStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS monthly_expense (
                    id INTEGER PRIMARY KEY,
                    month INTEGER NOT NULL,
                    budget_goal REAL NOT NULL,
                    user_id INTEGER NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    deleted_at TEXT,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteMonthlyExpenseStore {
    type ReturnType = MonthlyExpense;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let month = row.get(offset + 1)?;
        let budget_goal = row.get(offset + 2)?;
        let user_id = UserID::new(row.get(offset + 3)?);
        let created_at = row.get(offset + 4)?;
        let updated_at = row.get(offset + 5)?;
        let deleted_at = row.get(offset + 6)?;

        // The budget goal was validated before it was stored, so validation can be skipped here.
        let data = NewMonthlyExpense::new_unchecked(month, budget_goal);

        Ok(MonthlyExpense::new(
            id, data, user_id, created_at, updated_at, deleted_at,
        ))
    }
}
