//! This file defines the type `MonthlyExpense`, a budget for a single month, and the composite
//! type `MonthlyExpenseWithCashOnHand` that pairs a budget with its expenses and the money left
//! over.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    models::{DatabaseID, Expense, UserID},
};

/// The data needed to create a new monthly expense budget.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMonthlyExpense {
    month: i64,
    budget_goal: f64,
}

impl NewMonthlyExpense {
    /// Create the data for a new monthly expense budget.
    ///
    /// # Errors
    ///
    /// This function will return an error if `budget_goal` is zero or negative.
    pub fn new(month: i64, budget_goal: f64) -> Result<Self, Error> {
        if budget_goal <= 0.0 {
            return Err(Error::NonPositiveBudgetGoal(budget_goal));
        }

        Ok(Self { month, budget_goal })
    }

    /// Create the data for a new monthly expense budget without any validation.
    ///
    /// The caller should ensure that `budget_goal` is greater than zero.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the budget goal invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(month: i64, budget_goal: f64) -> Self {
        Self { month, budget_goal }
    }

    /// The month the budget is for.
    pub fn month(&self) -> i64 {
        self.month
    }

    /// The amount of money budgeted for the month.
    pub fn budget_goal(&self) -> f64 {
        self.budget_goal
    }
}

/// A budget for a single month.
///
/// You should not need to create this type directly, most code will get a `MonthlyExpense` from a
/// [MonthlyExpenseStore](crate::stores::MonthlyExpenseStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyExpense {
    id: DatabaseID,
    month: i64,
    budget_goal: f64,
    user_id: UserID,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    deleted_at: Option<OffsetDateTime>,
}

impl MonthlyExpense {
    /// Create a new monthly expense budget.
    ///
    /// This function does not add the budget to any database.
    pub fn new(
        id: DatabaseID,
        data: NewMonthlyExpense,
        user_id: UserID,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
        deleted_at: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            id,
            month: data.month,
            budget_goal: data.budget_goal,
            user_id,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    /// The ID of the budget in the database.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The month the budget is for.
    pub fn month(&self) -> i64 {
        self.month
    }

    /// The amount of money budgeted for the month.
    pub fn budget_goal(&self) -> f64 {
        self.budget_goal
    }

    /// The ID of the user that owns this budget.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// When the budget was created.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// When the budget was last updated.
    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    /// When the budget was soft-deleted, if it has been.
    pub fn deleted_at(&self) -> Option<OffsetDateTime> {
        self.deleted_at
    }

    /// Attach `expenses` to this budget and calculate the cash on hand.
    ///
    /// Cash on hand is the budget goal minus the sum of the expense amounts. It is negative when
    /// the expenses exceed the budget goal.
    pub fn with_expenses(self, expenses: Vec<Expense>) -> MonthlyExpenseWithCashOnHand {
        let total_spent: f64 = expenses.iter().map(|expense| expense.amount()).sum();
        let cash_on_hand = self.budget_goal - total_spent;

        MonthlyExpenseWithCashOnHand {
            monthly_expense: self,
            expenses,
            cash_on_hand,
        }
    }
}

/// A monthly expense budget combined with its expenses and the money left over.
///
/// The cash on hand is calculated when the budget is read, it is not stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyExpenseWithCashOnHand {
    /// The budget the expenses belong to.
    #[serde(flatten)]
    pub monthly_expense: MonthlyExpense,
    /// The expenses recorded against the budget.
    pub expenses: Vec<Expense>,
    /// The budget goal minus the sum of the expense amounts.
    pub cash_on_hand: f64,
}

#[cfg(test)]
mod new_monthly_expense_tests {
    use crate::{Error, models::NewMonthlyExpense};

    #[test]
    fn new_fails_on_zero_budget_goal() {
        let result = NewMonthlyExpense::new(7, 0.0);

        assert_eq!(result, Err(Error::NonPositiveBudgetGoal(0.0)));
    }

    #[test]
    fn new_fails_on_negative_budget_goal() {
        let result = NewMonthlyExpense::new(7, -250.0);

        assert_eq!(result, Err(Error::NonPositiveBudgetGoal(-250.0)));
    }

    #[test]
    fn new_succeeds_on_positive_budget_goal() {
        let result = NewMonthlyExpense::new(7, 1_000.0);

        assert!(result.is_ok());
    }
}

#[cfg(test)]
mod monthly_expense_tests {
    use time::OffsetDateTime;

    use crate::models::{
        Expense, ExpenseCategory, MonthlyExpense, NewExpense, NewMonthlyExpense, UserID,
    };

    fn get_budget(budget_goal: f64) -> MonthlyExpense {
        let now = OffsetDateTime::now_utc();

        MonthlyExpense::new(
            1,
            NewMonthlyExpense::new(3, budget_goal).unwrap(),
            UserID::new(1),
            now,
            now,
            None,
        )
    }

    fn get_expense(amount: f64, monthly_expense_id: i64) -> Expense {
        let now = OffsetDateTime::now_utc();
        let data = NewExpense::new(
            "Weekly shop".to_string(),
            ExpenseCategory::Grocery,
            amount,
            now,
            monthly_expense_id,
        )
        .unwrap();

        Expense::new(1, data, now, now, None)
    }

    #[test]
    fn with_expenses_subtracts_expense_amounts_from_budget_goal() {
        let budget = get_budget(1_000.0);
        let expenses = vec![get_expense(300.0, budget.id()), get_expense(150.0, budget.id())];

        let result = budget.with_expenses(expenses);

        assert_eq!(result.cash_on_hand, 550.0);
    }

    #[test]
    fn with_expenses_goes_negative_when_expenses_exceed_budget_goal() {
        let budget = get_budget(100.0);
        let expenses = vec![get_expense(175.5, budget.id())];

        let result = budget.with_expenses(expenses);

        assert_eq!(result.cash_on_hand, -75.5);
    }

    #[test]
    fn with_expenses_equals_budget_goal_when_there_are_no_expenses() {
        let budget = get_budget(1_234.56);

        let result = budget.with_expenses(vec![]);

        assert_eq!(result.cash_on_hand, 1_234.56);
        assert!(result.expenses.is_empty());
    }
}
