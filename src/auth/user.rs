use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Global roles known to the credential service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Advisor,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Advisor => "advisor",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(UserRole::Student),
            "advisor" => Ok(UserRole::Advisor),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Public view of a user, safe to hand back to API callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub disabled: bool,
}

/// A user as persisted in the credential store, including the password hash
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub hashed_password: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub disabled: bool,
}

impl UserRecord {
    /// Strip the password hash
    pub fn public(&self) -> User {
        User::from(self)
    }

    pub fn is_active(&self) -> bool {
        !self.disabled
    }
}

impl From<&UserRecord> for User {
    fn from(record: &UserRecord) -> Self {
        Self {
            email: record.email.clone(),
            full_name: record.full_name.clone(),
            role: record.role,
            disabled: record.disabled,
        }
    }
}

// Hash stays out of debug output
impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}
