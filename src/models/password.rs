//! This file defines the types for handling passwords on accounts that sign in locally.
//! A raw password is first checked for strength to produce a `ValidatedPassword`, which is then
//! salted and hashed into the `PasswordHash` that is stored in the database.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// A raw password that has passed the strength check but has not been hashed yet.
///
/// Displays as a fixed mask rather than the underlying string.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password` and wrap it if it is strong enough.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password is too weak. The error carries the
    /// strength checker's feedback so the client can tell the user how to pick a better password.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        let analysis = zxcvbn(raw_password, &[]);

        match analysis.score() {
            Score::Zero | Score::One | Score::Two => {
                let feedback = match analysis.feedback() {
                    Some(feedback) => feedback.to_string(),
                    None => String::new(),
                };

                Err(Error::TooWeak(feedback))
            }
            _ => Ok(Self(raw_password.to_string())),
        }
    }

    /// Wrap `raw_password` without checking its strength.
    ///
    /// The caller should ensure that `raw_password` is a strong password.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if a weak password is provided it may cause incorrect behaviour but will not affect memory safety.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_string())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "********")
    }
}

/// A salted and hashed password, ready to be stored or compared against.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default bcrypt cost.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash a validated password with the given `cost`.
    ///
    /// Each extra point of `cost` doubles the rounds of hashing, and therefore the time needed to
    /// create and verify the hash. Use [PasswordHash::DEFAULT_COST] outside of tests.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password could not be hashed.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap an existing hash string without checking it.
    ///
    /// The caller should ensure that `raw_password_hash` came from a bcrypt hashing routine.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid hash is provided it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Validate and hash a raw password in one step.
    ///
    /// This is named as a constructor rather than implemented as `From<String>` or `FromStr` to
    /// make it clear that the argument is a raw password, not an existing hash being parsed.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password is too weak or could not be hashed.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        Self::new(ValidatedPassword::new(raw_password)?, cost)
    }

    /// Check whether `raw_password` matches this hash.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod validated_password_tests {
    use crate::{Error, models::ValidatedPassword};

    #[test]
    fn new_rejects_empty_password() {
        let result = ValidatedPassword::new("");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_rejects_weak_password() {
        let result = ValidatedPassword::new("tooshort1");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_accepts_strong_password() {
        let result = ValidatedPassword::new("averylongandsecurepassword1");

        assert!(result.is_ok());
    }
}
