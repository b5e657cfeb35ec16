//! Defines the expense store trait.

use crate::{
    Error,
    models::{DatabaseID, Expense, ExpenseUpdate, NewExpense},
};

/// Handles the creation, modification, and deletion of expenses.
pub trait ExpenseStore {
    /// Create a new expense in the store.
    ///
    /// Returns [Error::InvalidForeignKey] if the monthly expense budget the expense refers to does
    /// not exist.
    fn create(&mut self, new_expense: NewExpense) -> Result<Expense, Error>;

    /// Apply a partial update to the expense with the ID `id`.
    ///
    /// Fields not present in `update` keep their stored values.
    ///
    /// Returns [Error::UpdateMissingExpense] if no expense with the given ID exists.
    fn update(&mut self, id: DatabaseID, update: ExpenseUpdate) -> Result<Expense, Error>;

    /// Delete the expense with the ID `id` from the store.
    ///
    /// Returns [Error::DeleteMissingExpense] if no expense with the given ID exists.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;
}
