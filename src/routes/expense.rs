//! The route handlers for creating, updating and deleting expenses.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    AppState, Error,
    auth::Claims,
    models::{DatabaseID, Expense, ExpenseCategory, ExpenseUpdate, NewExpense},
    stores::{ExpenseStore, MonthlyExpenseStore, UserStore},
};

/// The data the client must provide to create a new expense.
#[derive(Deserialize)]
pub struct ExpensePayload {
    /// A text description of what the expense was for.
    pub description: String,
    /// The name of one of the fixed expense categories.
    pub category: String,
    /// The amount of money spent.
    pub amount: f64,
    /// When the expense happened, as an RFC 3339 date-time string.
    pub date: String,
    /// The ID of the monthly expense budget the expense belongs to.
    pub monthly_expense_id: DatabaseID,
}

/// The data the client can provide to update an expense.
///
/// Fields that are left out keep their stored values.
#[derive(Deserialize)]
pub struct UpdateExpensePayload {
    /// A text description of what the expense was for.
    pub description: Option<String>,
    /// The name of one of the fixed expense categories.
    pub category: Option<String>,
    /// The amount of money spent.
    pub amount: Option<f64>,
    /// When the expense happened, as an RFC 3339 date-time string.
    pub date: Option<String>,
    /// The ID of the monthly expense budget the expense belongs to.
    pub monthly_expense_id: Option<DatabaseID>,
}

fn parse_date(raw_date: &str) -> Result<OffsetDateTime, Error> {
    OffsetDateTime::parse(raw_date, &Rfc3339)
        .map_err(|_| Error::InvalidDate(raw_date.to_string()))
}

/// A route handler for creating a new expense.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The category is not one of the fixed category names.
/// - The amount is zero or negative.
/// - The date is not a valid RFC 3339 date-time.
/// - The monthly expense ID does not refer to an existing budget.
pub async fn create_expense<E, M, U>(
    State(mut state): State<AppState<E, M, U>>,
    _claims: Claims,
    Json(payload): Json<ExpensePayload>,
) -> Result<(StatusCode, Json<Expense>), Error>
where
    E: ExpenseStore + Send + Sync,
    M: MonthlyExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let category = ExpenseCategory::from_str(&payload.category)?;
    let date = parse_date(&payload.date)?;

    let new_expense = NewExpense::new(
        payload.description,
        category,
        payload.amount,
        date,
        payload.monthly_expense_id,
    )?;

    let expense = state.expense_store.create(new_expense)?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// A route handler for updating the expense with the ID given in the URL path.
///
/// Only the fields present in the request body are changed.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - A field that is present fails the checks described in [create_expense].
/// - The expense ID does not refer to an existing expense.
pub async fn update_expense<E, M, U>(
    State(mut state): State<AppState<E, M, U>>,
    _claims: Claims,
    Path(expense_id): Path<DatabaseID>,
    Json(payload): Json<UpdateExpensePayload>,
) -> Result<Json<Expense>, Error>
where
    E: ExpenseStore + Send + Sync,
    M: MonthlyExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let category = payload
        .category
        .as_deref()
        .map(ExpenseCategory::from_str)
        .transpose()?;
    let date = payload.date.as_deref().map(parse_date).transpose()?;

    let update = ExpenseUpdate::new(
        payload.description,
        category,
        payload.amount,
        date,
        payload.monthly_expense_id,
    )?;

    let expense = state.expense_store.update(expense_id, update)?;

    Ok(Json(expense))
}

/// A route handler for deleting the expense with the ID given in the URL path.
///
/// # Errors
///
/// This function will return an error if the expense ID does not refer to an
/// existing expense.
pub async fn delete_expense<E, M, U>(
    State(mut state): State<AppState<E, M, U>>,
    _claims: Claims,
    Path(expense_id): Path<DatabaseID>,
) -> Result<StatusCode, Error>
where
    E: ExpenseStore + Send + Sync,
    M: MonthlyExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    state.expense_store.delete(expense_id)?;

    Ok(StatusCode::NO_CONTENT)
}
