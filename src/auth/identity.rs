//! Per-request identity: token -> live user record

use crate::auth::token::TokenManager;
use crate::auth::user::UserRecord;
use crate::error::{Result, RustyCredsError};
use crate::storage::UserStore;

/// Validate `token` and re-read its subject from the store
///
/// The record is looked up on every call, so users that were deleted or
/// disabled after the token was issued are rejected.
pub fn resolve_identity(store: &UserStore, tokens: &TokenManager, token: &str) -> Result<UserRecord> {
    let subject = tokens.validate_and_get_subject(token)?;

    let record = store
        .find(&subject)?
        .ok_or(RustyCredsError::UnknownSubject(subject))?;

    if record.disabled {
        return Err(RustyCredsError::InactiveUser(record.email));
    }

    Ok(record)
}
