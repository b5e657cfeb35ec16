//! Budget Tracker is a web app for planning monthly budgets and recording
//! expenses against them.
//!
//! This library provides a REST API that serves JSON.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
pub mod auth;
pub mod db;
mod logging;
pub mod models;
pub mod routes;
pub mod stores;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routes::build_router;

/// An async task that tells the server to shut down gracefully once the process receives either
/// the ctrl+c or the terminate signal.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Got the ctrl+c signal, shutting down.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Got the terminate signal, shutting down.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The string used to create an email address was not a valid email
    /// address. The error message explains what is wrong with the string.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// An empty string was used to create a mobile number.
    #[error("mobile number cannot be empty")]
    EmptyMobile,

    /// The password failed the strength check. The message carries the
    /// strength checker's feedback on how to pick a better password.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The hashing library reported an error.
    ///
    /// The inner string is for server-side logs only, clients get a generic
    /// internal server error instead.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The user provided an invalid combination of email and password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The bearer token was missing, malformed or expired.
    #[error("invalid bearer token")]
    InvalidToken,

    /// The string used to create an expense category did not match any of
    /// the fixed category names.
    #[error("\"{0}\" is not a valid expense category")]
    InvalidCategory(String),

    /// A zero or negative amount was used to create or update an expense.
    #[error("{0} is not a valid expense amount, amounts must be greater than zero")]
    NonPositiveAmount(f64),

    /// A zero or negative budget goal was used to create a monthly expense.
    #[error("{0} is not a valid budget goal, budget goals must be greater than zero")]
    NonPositiveBudgetGoal(f64),

    /// A date string could not be parsed as an RFC 3339 date-time.
    #[error("could not parse \"{0}\" as an RFC 3339 date-time")]
    InvalidDate(String),

    /// Another user is already registered with the given email address. The
    /// client should try a different one.
    #[error("the email is already in use")]
    DuplicateEmail,

    /// The password hash collided with one already in the database. This
    /// should be extremely rare, the caller can rehash and try again.
    #[error("the password hash is not unique")]
    DuplicatePassword,

    /// A query was given an ID that does not refer to a valid row. The
    /// client should check that the ids are valid.
    #[error("a given ID does not refer to a valid row")]
    InvalidForeignKey,

    /// The requested resource does not exist, or does not belong to the
    /// requesting user. Raised when a query comes back with no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist.
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist.
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// Wrapper for SQL errors that none of the other variants cover.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 787 =>
            {
                Error::InvalidForeignKey
            }
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("password") =>
            {
                Error::DuplicatePassword
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("An unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Error::InvalidEmail(_)
            | Error::EmptyMobile
            | Error::TooWeak(_)
            | Error::InvalidToken
            | Error::InvalidCategory(_)
            | Error::NonPositiveAmount(_)
            | Error::NonPositiveBudgetGoal(_)
            | Error::InvalidDate(_)
            | Error::DuplicateEmail
            | Error::DuplicatePassword
            | Error::InvalidForeignKey => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            Error::NotFound | Error::UpdateMissingExpense | Error::DeleteMissingExpense => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            // The remaining errors carry internal details that must not reach the client.
            error => {
                tracing::error!("Responding with an internal server error: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
