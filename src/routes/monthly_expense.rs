//! The route handlers for creating and reading monthly expense budgets.
//!
//! The owning user is always resolved from the verified bearer token, never
//! from the request body.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::Claims,
    models::{DatabaseID, MonthlyExpense, MonthlyExpenseWithCashOnHand, NewMonthlyExpense},
    stores::{ExpenseStore, MonthlyExpenseStore, UserStore},
};

/// The data the client must provide to create a new monthly expense budget.
#[derive(Deserialize)]
pub struct MonthlyExpensePayload {
    /// The month the budget is for.
    pub month: i64,
    /// The amount of money budgeted for the month.
    pub budget_goal: f64,
}

/// The query parameters for getting a single monthly expense budget.
#[derive(Deserialize)]
pub struct MonthlyExpenseQuery {
    /// The ID of the monthly expense budget.
    pub id: DatabaseID,
}

/// A route handler for creating a new monthly expense budget owned by the
/// signed in user.
///
/// # Errors
///
/// This function will return an error if the budget goal is zero or negative.
pub async fn create_monthly_expense<E, M, U>(
    State(mut state): State<AppState<E, M, U>>,
    claims: Claims,
    Json(payload): Json<MonthlyExpensePayload>,
) -> Result<(StatusCode, Json<MonthlyExpense>), Error>
where
    E: ExpenseStore + Send + Sync,
    M: MonthlyExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let user = state.user_store.get_by_email(&claims.email)?;

    let new_monthly_expense = NewMonthlyExpense::new(payload.month, payload.budget_goal)?;

    let monthly_expense = state
        .monthly_expense_store
        .create(new_monthly_expense, user.id())?;

    Ok((StatusCode::CREATED, Json(monthly_expense)))
}

/// A route handler for getting one of the signed in user's monthly expense
/// budgets along with its expenses and cash on hand.
///
/// # Errors
///
/// This function will return an error if the ID does not refer to a monthly
/// expense budget owned by the signed in user.
pub async fn get_monthly_expense<E, M, U>(
    State(state): State<AppState<E, M, U>>,
    claims: Claims,
    Query(query): Query<MonthlyExpenseQuery>,
) -> Result<Json<MonthlyExpenseWithCashOnHand>, Error>
where
    E: ExpenseStore + Send + Sync,
    M: MonthlyExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let user = state.user_store.get_by_email(&claims.email)?;

    let monthly_expense = state.monthly_expense_store.get(query.id, user.id())?;

    Ok(Json(monthly_expense))
}

/// A route handler for listing every monthly expense budget of the signed in
/// user, each with its expenses and cash on hand, ordered by month.
pub async fn get_monthly_expenses<E, M, U>(
    State(state): State<AppState<E, M, U>>,
    claims: Claims,
) -> Result<Json<Vec<MonthlyExpenseWithCashOnHand>>, Error>
where
    E: ExpenseStore + Send + Sync,
    M: MonthlyExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let user = state.user_store.get_by_email(&claims.email)?;

    let monthly_expenses = state.monthly_expense_store.get_all(user.id())?;

    Ok(Json(monthly_expenses))
}

#[cfg(test)]
mod monthly_expense_route_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        models::{MonthlyExpense, MonthlyExpenseWithCashOnHand},
        routes::{build_router, endpoints},
        stores::sqlite::create_app_state,
    };

    const TEST_EMAIL: &str = "test@test.com";
    const TEST_PASSWORD: &str = "averylongandsecurepassword1";

    async fn register_and_sign_in(server: &TestServer, email: &str) -> String {
        server
            .post(endpoints::REGISTER)
            .content_type("application/json")
            .json(&json!({
                "mobile": "021 123 4567",
                "password": TEST_PASSWORD,
                "email": email,
            }))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .post(endpoints::SIGN_IN)
            .content_type("application/json")
            .json(&json!({
                "email": email,
                "password": TEST_PASSWORD,
            }))
            .await
            .json::<String>()
    }

    async fn create_app_with_user() -> (TestServer, String) {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = create_app_state(db_connection, "foobar").expect("Could not create app state.");

        let server = TestServer::new(build_router(state));

        let token = register_and_sign_in(&server, TEST_EMAIL).await;

        (server, token)
    }

    async fn create_test_budget(server: &TestServer, token: &str, month: i64) -> MonthlyExpense {
        server
            .post(endpoints::MONTH_EXPENSE)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "month": month,
                "budget_goal": 1000.0,
            }))
            .await
            .json::<MonthlyExpense>()
    }

    async fn create_test_expense(server: &TestServer, token: &str, budget_id: i64, amount: f64) {
        server
            .post(endpoints::POST_EXPENSE)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "description": "Weekly shop",
                "category": "GROCERY",
                "amount": amount,
                "date": "2025-04-15T12:30:00Z",
                "monthly_expense_id": budget_id,
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn create_monthly_expense_succeeds() {
        let (server, token) = create_app_with_user().await;

        let response = server
            .post(endpoints::MONTH_EXPENSE)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "month": 7,
                "budget_goal": 1250.5,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);

        let monthly_expense = response.json::<MonthlyExpense>();
        assert!(monthly_expense.id() > 0);
        assert_eq!(monthly_expense.month(), 7);
        assert_eq!(monthly_expense.budget_goal(), 1250.5);
    }

    #[tokio::test]
    async fn create_monthly_expense_fails_with_non_positive_budget_goal() {
        let (server, token) = create_app_with_user().await;

        server
            .post(endpoints::MONTH_EXPENSE)
            .authorization_bearer(token)
            .content_type("application/json")
            .json(&json!({
                "month": 7,
                "budget_goal": 0.0,
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_monthly_expense_fails_without_token() {
        let (server, _) = create_app_with_user().await;

        server
            .post(endpoints::MONTH_EXPENSE)
            .content_type("application/json")
            .json(&json!({
                "month": 7,
                "budget_goal": 1000.0,
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_monthly_expense_attaches_expenses_and_cash_on_hand() {
        let (server, token) = create_app_with_user().await;
        let budget = create_test_budget(&server, &token, 7).await;

        create_test_expense(&server, &token, budget.id(), 150.5).await;
        create_test_expense(&server, &token, budget.id(), 249.5).await;

        let response = server
            .get(endpoints::MONTHLY_EXPENSE)
            .authorization_bearer(token)
            .add_query_param("id", budget.id())
            .await;

        response.assert_status_ok();

        let budget_with_cash_on_hand = response.json::<MonthlyExpenseWithCashOnHand>();
        assert_eq!(budget_with_cash_on_hand.expenses.len(), 2);
        assert_eq!(budget_with_cash_on_hand.cash_on_hand, 600.0);
    }

    #[tokio::test]
    async fn get_monthly_expense_with_no_expenses_returns_budget_goal() {
        let (server, token) = create_app_with_user().await;
        let budget = create_test_budget(&server, &token, 7).await;

        let budget_with_cash_on_hand = server
            .get(endpoints::MONTHLY_EXPENSE)
            .authorization_bearer(token)
            .add_query_param("id", budget.id())
            .await
            .json::<MonthlyExpenseWithCashOnHand>();

        assert!(budget_with_cash_on_hand.expenses.is_empty());
        assert_eq!(budget_with_cash_on_hand.cash_on_hand, budget.budget_goal());
    }

    #[tokio::test]
    async fn get_monthly_expense_has_negative_cash_on_hand_when_over_budget() {
        let (server, token) = create_app_with_user().await;
        let budget = create_test_budget(&server, &token, 7).await;

        create_test_expense(&server, &token, budget.id(), 1200.5).await;

        let budget_with_cash_on_hand = server
            .get(endpoints::MONTHLY_EXPENSE)
            .authorization_bearer(token)
            .add_query_param("id", budget.id())
            .await
            .json::<MonthlyExpenseWithCashOnHand>();

        assert_eq!(budget_with_cash_on_hand.cash_on_hand, -200.5);
    }

    #[tokio::test]
    async fn get_monthly_expense_fails_with_missing_id() {
        let (server, token) = create_app_with_user().await;

        server
            .get(endpoints::MONTHLY_EXPENSE)
            .authorization_bearer(token)
            .add_query_param("id", 1337)
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn get_monthly_expense_fails_on_other_users_budget() {
        let (server, token) = create_app_with_user().await;
        let budget = create_test_budget(&server, &token, 7).await;

        let other_token = register_and_sign_in(&server, "other@test.com").await;

        server
            .get(endpoints::MONTHLY_EXPENSE)
            .authorization_bearer(other_token)
            .add_query_param("id", budget.id())
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn get_monthly_expenses_returns_budgets_in_month_order() {
        let (server, token) = create_app_with_user().await;

        create_test_budget(&server, &token, 3).await;
        create_test_budget(&server, &token, 1).await;
        create_test_budget(&server, &token, 2).await;

        let budgets = server
            .get(endpoints::MONTHLY_EXPENSES)
            .authorization_bearer(token)
            .await
            .json::<Vec<MonthlyExpenseWithCashOnHand>>();

        let months: Vec<i64> = budgets
            .iter()
            .map(|budget| budget.monthly_expense.month())
            .collect();

        assert_eq!(months, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn get_monthly_expenses_attaches_cash_on_hand_to_every_budget() {
        let (server, token) = create_app_with_user().await;

        let first_budget = create_test_budget(&server, &token, 1).await;
        create_test_budget(&server, &token, 2).await;

        create_test_expense(&server, &token, first_budget.id(), 120.0).await;

        let budgets = server
            .get(endpoints::MONTHLY_EXPENSES)
            .authorization_bearer(token)
            .await
            .json::<Vec<MonthlyExpenseWithCashOnHand>>();

        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0].cash_on_hand, 880.0);
        assert_eq!(budgets[1].cash_on_hand, 1000.0);
    }

    #[tokio::test]
    async fn get_monthly_expenses_returns_empty_list_for_new_user() {
        let (server, token) = create_app_with_user().await;

        let response = server
            .get(endpoints::MONTHLY_EXPENSES)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();

        let budgets = response.json::<Vec<MonthlyExpenseWithCashOnHand>>();
        assert!(budgets.is_empty());
    }
}
