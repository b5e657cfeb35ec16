//! This module defines the domain data types.

pub use expense::{Expense, ExpenseCategory, ExpenseUpdate, NewExpense};
pub use monthly_expense::{MonthlyExpense, MonthlyExpenseWithCashOnHand, NewMonthlyExpense};
pub use password::{PasswordHash, ValidatedPassword};
pub use user::{Mobile, NewUser, User, UserID};

mod expense;
mod monthly_expense;
mod password;
mod user;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
