//! The URIs for the API's endpoints.
//!
//! For endpoints that take a parameter, e.g., '/api/{expense_id}', use [format_endpoint].

/// The route for requesting a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for registering new users.
pub const REGISTER: &str = "/api/register";
/// The route for signing in a user.
pub const SIGN_IN: &str = "/api/sign_in";
/// The route to create an expense.
pub const POST_EXPENSE: &str = "/api";
/// The route to update an expense.
pub const PUT_EXPENSE: &str = "/api/{expense_id}";
/// The route to delete an expense.
pub const DELETE_EXPENSE: &str = "/api/{expense_id}";
/// The route to create a monthly expense budget.
pub const MONTH_EXPENSE: &str = "/api/month-expense";
/// The route to get a single monthly expense budget with its cash on hand.
pub const MONTHLY_EXPENSE: &str = "/api/monthly-expense";
/// The route to list the monthly expense budgets of the signed in user.
pub const MONTHLY_EXPENSES: &str = "/api/monthly-expenses";
/// The route for static files.
pub const STATIC: &str = "/static";

/// Substitute `id` for the parameter in `endpoint_path`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If `endpoint_path` has no parameter it is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
