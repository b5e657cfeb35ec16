//! Implements JWT authentication: issuing tokens at sign-in and checking the
//! tokens presented to protected routes.

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, FromRequestParts, State},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use email_address::EmailAddress;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    AppState, Error,
    stores::{ExpenseStore, MonthlyExpenseStore, UserStore},
};

// Code in this module is adapted from https://github.com/ezesundayeze/axum--auth and https://github.com/tokio-rs/axum/blob/main/examples/jwt/src/main.rs

/// How long a token stays valid after it is issued.
const TOKEN_DURATION: Duration = Duration::minutes(15);

/// The keys for signing and checking JSON Web Tokens.
#[derive(Clone)]
pub struct JwtKeys {
    /// The key used to sign new tokens.
    pub encoding_key: EncodingKey,
    /// The key used to check incoming tokens.
    pub decoding_key: DecodingKey,
}

impl JwtKeys {
    /// Create the signing and checking keys from a `secret` string.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

/// The contents of a JSON Web Token.
#[derive(Serialize, Deserialize)]
pub struct Claims {
    /// The expiry time of the token.
    pub exp: usize,
    /// The time the token was issued.
    pub iat: usize,
    /// Email associated with the token.
    pub email: EmailAddress,
}

impl<S> FromRequestParts<S> for Claims
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::InvalidToken)?;

        let jwt_keys = JwtKeys::from_ref(state);

        let token_data = decode_jwt(bearer.token(), &jwt_keys.decoding_key)?;

        Ok(token_data.claims)
    }
}

/// The data the client must provide to sign in.
#[derive(Deserialize)]
pub struct Credentials {
    /// Email entered during sign-in.
    pub email: EmailAddress,
    /// Password entered during sign-in.
    pub password: String,
}

/// Handler for sign-in requests. Responds with a fresh JWT on success.
///
/// # Errors
///
/// This function will return an error when:
/// - No user is registered with the given email.
/// - The password does not match the stored hash.
/// - The hashing library failed to verify the password.
pub async fn sign_in<E, M, U>(
    State(state): State<AppState<E, M, U>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<String>, Error>
where
    E: ExpenseStore + Send + Sync,
    M: MonthlyExpenseStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let user = state
        .user_store
        .get_by_email(&credentials.email)
        .map_err(|error| match error {
            // The response must not reveal whether it was the email or the password that was
            // wrong.
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?;

    let password_is_correct = user
        .password_hash()
        .verify(&credentials.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if password_is_correct {
        let token = encode_jwt(user.email(), &state.jwt_keys.encoding_key);

        Ok(Json(token))
    } else {
        Err(Error::InvalidCredentials)
    }
}

fn encode_jwt(email: &EmailAddress, encoding_key: &EncodingKey) -> String {
    let now = OffsetDateTime::now_utc();
    let exp = (now + TOKEN_DURATION).unix_timestamp() as usize;
    let iat = now.unix_timestamp() as usize;
    let claims = Claims {
        exp,
        iat,
        email: email.to_owned(),
    };

    encode(&Header::default(), &claims, encoding_key).unwrap()
}

fn decode_jwt(token: &str, decoding_key: &DecodingKey) -> Result<TokenData<Claims>, Error> {
    decode(token, decoding_key, &Validation::default()).map_err(|_| Error::InvalidToken)
}
