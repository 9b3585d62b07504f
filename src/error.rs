use std::error::Error;
use std::fmt;
use std::sync::PoisonError;

#[derive(Debug)]
pub enum RustyCredsError {
    // Credential store errors
    DuplicateUser(String),
    UserNotFound(String),
    StorageError(String),
    LockError(String),

    // Authentication errors
    AuthFailed,
    HashError(String),

    // Token errors
    InvalidToken(String),
    ExpiredToken,
    TokenError(String),

    // Identity errors
    UnknownSubject(String),
    InactiveUser(String),

    // Authorization errors
    Forbidden,

    // Configuration errors
    ConfigError(String),
}

impl RustyCredsError {
    /// True for failures the API boundary reports as "unauthenticated" (401)
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::AuthFailed
                | Self::InvalidToken(_)
                | Self::ExpiredToken
                | Self::UnknownSubject(_)
                | Self::InactiveUser(_)
        )
    }

    /// True for an authenticated caller lacking the required role (403)
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden)
    }
}

impl fmt::Display for RustyCredsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateUser(email) => write!(f, "Email already registered: {}", email),
            Self::UserNotFound(email) => write!(f, "User not found: {}", email),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::LockError(msg) => write!(f, "Lock error: {}", msg),
            // Deliberately identical for unknown email and wrong password
            Self::AuthFailed => write!(f, "Incorrect email or password"),
            Self::HashError(msg) => write!(f, "Password hashing error: {}", msg),
            // The reason is kept for logs only
            Self::InvalidToken(_) => write!(f, "Could not validate credentials"),
            Self::ExpiredToken => write!(f, "Token expired"),
            Self::TokenError(msg) => write!(f, "Token error: {}", msg),
            Self::UnknownSubject(_) => write!(f, "Could not validate credentials"),
            Self::InactiveUser(_) => write!(f, "Inactive user"),
            Self::Forbidden => write!(f, "Forbidden: insufficient permissions"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for RustyCredsError {}

// Converting from PoisonError to facilitate poisoned mutex handling
impl<T> From<PoisonError<T>> for RustyCredsError {
    fn from(err: PoisonError<T>) -> Self {
        RustyCredsError::LockError(format!("Mutex poisoned: {}", err))
    }
}

// Generic result type for RustyCreds
pub type Result<T> = std::result::Result<T, RustyCredsError>;
