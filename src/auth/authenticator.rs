//! Email + password authentication against the credential store

use crate::auth::password::{verify_against_dummy, verify_password};
use crate::auth::user::UserRecord;
use crate::error::{Result, RustyCredsError};
use crate::storage::UserStore;

/// Authenticate a user by email and password
///
/// Unknown email and wrong password both yield `AuthFailed`, so callers
/// cannot probe which emails are registered.
pub fn authenticate(store: &UserStore, email: &str, password: &str) -> Result<UserRecord> {
    let record = match store.find(email)? {
        Some(record) => record,
        None => {
            verify_against_dummy(password);
            return Err(RustyCredsError::AuthFailed);
        }
    };

    if !verify_password(password, &record.hashed_password) {
        return Err(RustyCredsError::AuthFailed);
    }

    Ok(record)
}
