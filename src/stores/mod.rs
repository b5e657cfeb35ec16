//! Contains traits and implementations for objects that store the domain [models](crate::models).

mod expense;
mod monthly_expense;
mod user;

pub mod sqlite;

pub use expense::ExpenseStore;
pub use monthly_expense::MonthlyExpenseStore;
pub use user::UserStore;
