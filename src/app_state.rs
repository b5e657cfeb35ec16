//! Implements a struct that holds the state of the REST server.

use std::marker::{Send, Sync};

use axum::extract::FromRef;

use crate::{
    auth::JwtKeys,
    stores::{ExpenseStore, MonthlyExpenseStore, UserStore},
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState<E, M, U>
where
    E: ExpenseStore + Send + Sync,
    M: MonthlyExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// The keys for signing and checking JWTs.
    pub jwt_keys: JwtKeys,
    /// The store for managing [expenses](crate::models::Expense).
    pub expense_store: E,
    /// The store for managing [monthly expense budgets](crate::models::MonthlyExpense).
    pub monthly_expense_store: M,
    /// The store for managing [users](crate::models::User).
    pub user_store: U,
}

impl<E, M, U> AppState<E, M, U>
where
    E: ExpenseStore + Send + Sync,
    M: MonthlyExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// Create a new [AppState].
    pub fn new(
        jwt_secret: &str,
        expense_store: E,
        monthly_expense_store: M,
        user_store: U,
    ) -> Self {
        Self {
            jwt_keys: JwtKeys::new(jwt_secret),
            expense_store,
            monthly_expense_store,
            user_store,
        }
    }
}

// this impl tells the `Claims` extractor how to access the keys from our state
impl<E, M, U> FromRef<AppState<E, M, U>> for JwtKeys
where
    E: ExpenseStore + Send + Sync,
    M: MonthlyExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    fn from_ref(state: &AppState<E, M, U>) -> Self {
        state.jwt_keys.clone()
    }
}
