//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{NewUser, User},
};

/// Handles the creation and retrieval of User objects.
pub trait UserStore {
    /// Create a new user in the store.
    ///
    /// Returns [Error::DuplicateEmail] if a user with the same email already exists.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error>;

    /// Get a user by their email.
    ///
    /// Returns [Error::NotFound] if no user with the given email exists.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;
}
