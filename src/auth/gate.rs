use crate::auth::user::{UserRecord, UserRole};
use crate::error::{Result, RustyCredsError};

/// Pass `record` through if its role is in `allowed`
pub fn require_role(record: UserRecord, allowed: &[UserRole]) -> Result<UserRecord> {
    if allowed.contains(&record.role) {
        Ok(record)
    } else {
        Err(RustyCredsError::Forbidden)
    }
}
