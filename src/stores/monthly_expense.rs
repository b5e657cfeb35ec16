//! Defines the monthly expense store trait.

use crate::{
    Error,
    models::{DatabaseID, MonthlyExpense, MonthlyExpenseWithCashOnHand, NewMonthlyExpense, UserID},
};

/// Handles the creation and retrieval of monthly expense budgets.
pub trait MonthlyExpenseStore {
    /// Create a new monthly expense budget for the user `user_id`.
    ///
    /// Returns [Error::InvalidForeignKey] if `user_id` does not refer to a valid user.
    fn create(
        &mut self,
        new_monthly_expense: NewMonthlyExpense,
        user_id: UserID,
    ) -> Result<MonthlyExpense, Error>;

    /// Get the monthly expense budget with the ID `id` belonging to the user `user_id`, along
    /// with its expenses and cash on hand.
    ///
    /// Returns [Error::NotFound] if no budget matches the ID, or if the budget belongs to another
    /// user. The two cases are indistinguishable so that clients cannot enumerate other users'
    /// budgets.
    fn get(&self, id: DatabaseID, user_id: UserID) -> Result<MonthlyExpenseWithCashOnHand, Error>;

    /// Get every monthly expense budget belonging to the user `user_id`, each with its expenses
    /// and cash on hand, ordered by month.
    ///
    /// Returns an empty vector if the user has no budgets.
    fn get_all(&self, user_id: UserID) -> Result<Vec<MonthlyExpenseWithCashOnHand>, Error>;
}
