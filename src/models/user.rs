//! This file defines the application's user model and its supporting types.

use std::fmt::Display;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, models::PasswordHash};

/// A newtype wrapper for integer user IDs.
/// Keeping user IDs as their own type stops them being mixed up with the IDs of other models at
/// compile time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Create a user ID from an integer.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The ID as a plain integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user's mobile phone number.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mobile(String);

impl Mobile {
    /// Create a mobile number.
    ///
    /// # Errors
    ///
    /// This function will return an error if `mobile` is empty or contains only whitespace.
    pub fn new(mobile: &str) -> Result<Self, Error> {
        if mobile.trim().is_empty() {
            Err(Error::EmptyMobile)
        } else {
            Ok(Self(mobile.to_string()))
        }
    }

    /// Create a mobile number without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(mobile: &str) -> Self {
        Self(mobile.to_string())
    }
}

impl AsRef<str> for Mobile {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Mobile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The data needed to create a new user.
///
/// The fields are assumed to have been validated already, e.g. via
/// [Mobile::new] and [EmailAddress::from_str](std::str::FromStr).
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The user's given name, if they provided one.
    pub first_name: Option<String>,
    /// The user's family name, if they provided one.
    pub last_name: Option<String>,
    /// The user's mobile phone number.
    pub mobile: Mobile,
    /// The user's email address.
    pub email: EmailAddress,
    /// The user's hashed password.
    pub password_hash: PasswordHash,
    /// An identifier from an external identity provider, if the account was
    /// created through one.
    pub auth_id: Option<String>,
}

/// A registered user of the application.
///
/// You should not need to create this type directly, most code will get a
/// `User` from a [UserStore](crate::stores::UserStore).
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserID,
    first_name: Option<String>,
    last_name: Option<String>,
    mobile: Mobile,
    email: EmailAddress,
    password_hash: PasswordHash,
    auth_id: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    deleted_at: Option<OffsetDateTime>,
}

impl User {
    /// Create a new user.
    ///
    /// This function does not add the user to any database.
    pub fn new(
        id: UserID,
        data: NewUser,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
        deleted_at: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            id,
            first_name: data.first_name,
            last_name: data.last_name,
            mobile: data.mobile,
            email: data.email,
            password_hash: data.password_hash,
            auth_id: data.auth_id,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The user's given name, if they provided one.
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// The user's family name, if they provided one.
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// The user's mobile phone number.
    pub fn mobile(&self) -> &Mobile {
        &self.mobile
    }

    /// The email address associated with the user.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// The identifier assigned by an external identity provider, if any.
    pub fn auth_id(&self) -> Option<&str> {
        self.auth_id.as_deref()
    }

    /// When the user was created.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// When the user was last updated.
    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    /// When the user was soft-deleted, if they have been.
    pub fn deleted_at(&self) -> Option<OffsetDateTime> {
        self.deleted_at
    }
}
