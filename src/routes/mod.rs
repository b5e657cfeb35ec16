//! This module wires up the REST API's routes and defines their handlers.

use axum::{
    Router,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, auth,
    stores::{ExpenseStore, MonthlyExpenseStore, UserStore},
};

pub mod endpoints;
mod expense;
mod monthly_expense;
pub mod register;

/// Build the router for all the app's routes.
pub fn build_router<E, M, U>(state: AppState<E, M, U>) -> Router
where
    E: ExpenseStore + Clone + Send + Sync + 'static,
    M: MonthlyExpenseStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::REGISTER, post(register::create_user))
        .route(endpoints::SIGN_IN, post(auth::sign_in));

    // The `Claims` argument on these handlers rejects requests that do not carry a valid bearer
    // token, so no extra auth middleware is layered here.
    let protected_routes = Router::new()
        .route(endpoints::POST_EXPENSE, post(expense::create_expense))
        .route(endpoints::PUT_EXPENSE, put(expense::update_expense))
        .route(endpoints::DELETE_EXPENSE, delete(expense::delete_expense))
        .route(
            endpoints::MONTH_EXPENSE,
            post(monthly_expense::create_monthly_expense),
        )
        .route(
            endpoints::MONTHLY_EXPENSE,
            get(monthly_expense::get_monthly_expense),
        )
        .route(
            endpoints::MONTHLY_EXPENSES,
            get(monthly_expense::get_monthly_expenses),
        );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("public/"))
        .with_state(state)
}

/// Ask the server for a cup of coffee.
async fn get_coffee() -> StatusCode {
    StatusCode::IM_A_TEAPOT
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{routes::endpoints, stores::sqlite::create_app_state};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = create_app_state(db_connection, "foobar").expect("Could not create app state.");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn getting_coffee_returns_i_am_a_teapot() {
        get_test_server()
            .get(endpoints::COFFEE)
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn unknown_route_returns_not_found() {
        get_test_server()
            .get("/definitely/not/a/route")
            .await
            .assert_status_not_found();
    }
}
