//! The route handler for registering new users.

use std::str::FromStr;

use axum::{Json, extract::State, http::StatusCode};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    models::{Mobile, NewUser, PasswordHash, UserID, ValidatedPassword},
    stores::{ExpenseStore, MonthlyExpenseStore, UserStore},
};

/// The data the client must provide to register a new user.
#[derive(Deserialize)]
pub struct RegisterPayload {
    /// The user's given name.
    pub first_name: Option<String>,
    /// The user's family name.
    pub last_name: Option<String>,
    /// The user's mobile phone number.
    pub mobile: String,
    /// The password for signing in. Accounts managed by an external identity
    /// provider omit this.
    pub password: Option<String>,
    /// The user's email address.
    pub email: String,
}

/// The subset of the new user's fields that is sent back to the client.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// The ID of the new user.
    pub id: UserID,
    /// The email the user registered with.
    pub email: EmailAddress,
}

/// A route handler for registering a new user.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email is not a valid email address.
/// - The mobile number is empty.
/// - The password is too weak.
/// - The email is already in use.
pub async fn create_user<E, M, U>(
    State(mut state): State<AppState<E, M, U>>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<RegisterResponse>), Error>
where
    E: ExpenseStore + Send + Sync,
    M: MonthlyExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let email = EmailAddress::from_str(&payload.email)
        .map_err(|error| Error::InvalidEmail(error.to_string()))?;
    let mobile = Mobile::new(&payload.mobile)?;

    let password_hash = match payload.password {
        Some(raw_password) => {
            PasswordHash::from_raw_password(&raw_password, PasswordHash::DEFAULT_COST)?
        }
        // Accounts managed by an external identity provider have no local password, so the
        // strength check is skipped and a placeholder is hashed instead.
        None => PasswordHash::new(
            ValidatedPassword::new_unchecked(""),
            PasswordHash::DEFAULT_COST,
        )?,
    };

    let auth_id = format!("local|{email}");

    let user = state.user_store.create(NewUser {
        first_name: payload.first_name,
        last_name: payload.last_name,
        mobile,
        email,
        password_hash,
        auth_id: Some(auth_id),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id(),
            email: user.email().to_owned(),
        }),
    ))
}
