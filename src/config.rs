//! Service configuration module
//! Handles the signing secret, token lifetime, store location and bootstrap admin

use crate::constants::{
    DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_NAME, DEFAULT_STORE_PATH, DEFAULT_TOKEN_TTL_MINUTES,
    MIN_SECRET_LENGTH,
};
use crate::error::{Result, RustyCredsError};
use std::env;
use std::path::PathBuf;

/// Seed administrator written when the credential store does not exist yet
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub full_name: Option<String>,
    pub password: String,
}

impl BootstrapAdmin {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            full_name: Some(DEFAULT_ADMIN_NAME.to_string()),
            password: password.into(),
        }
    }
}

// Manual impl keeps the password out of debug output
impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credential service configuration parameters
#[derive(Clone)]
pub struct CredsConfig {
    /// JWT secret for token signing/validation
    pub jwt_secret: String,
    /// Validity window of issued tokens
    pub token_ttl: chrono::Duration,
    /// Location of the user document
    pub store_path: PathBuf,
    /// Seed administrator, only needed when the store must be created
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl std::fmt::Debug for CredsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredsConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("store_path", &self.store_path)
            .field("bootstrap_admin", &self.bootstrap_admin)
            .finish()
    }
}

impl CredsConfig {
    /// Build a configuration programmatically. The secret is validated the same way as from_env
    pub fn new(jwt_secret: impl Into<String>, store_path: impl Into<PathBuf>) -> Result<Self> {
        let jwt_secret = jwt_secret.into();
        Self::validate_jwt_secret(&jwt_secret)?;

        Ok(Self {
            jwt_secret,
            token_ttl: chrono::Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            store_path: store_path.into(),
            bootstrap_admin: None,
        })
    }

    pub fn with_token_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_bootstrap_admin(mut self, admin: BootstrapAdmin) -> Self {
        self.bootstrap_admin = Some(admin);
        self
    }

    /// Validate that a secret meets security requirements
    fn validate_secret(secret: &str, secret_type: &str) -> Result<()> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(RustyCredsError::ConfigError(format!(
                "{} secret must be at least {} characters long",
                secret_type, MIN_SECRET_LENGTH
            )));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "changeme",
            "test-secret",
            "default",
            "secret",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.to_lowercase().contains(pattern) {
                return Err(RustyCredsError::ConfigError(format!(
                    "{} secret contains insecure pattern '{}'. Please use a secure random secret generated with: openssl rand -base64 32",
                    secret_type, pattern
                )));
            }
        }

        // Ensure some complexity
        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RustyCredsError::ConfigError(format!(
                "{} secret should contain mixed characters (letters, numbers, symbols) for security",
                secret_type
            )));
        }

        Ok(())
    }

    /// Validate JWT secret meets security requirements
    fn validate_jwt_secret(secret: &str) -> Result<()> {
        Self::validate_secret(secret, "JWT")
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("RUSTY_CREDS_JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .map_err(|_| {
                RustyCredsError::ConfigError(
                    "JWT_SECRET environment variable is required for security. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;

        let ttl_minutes = match env::var("RUSTY_CREDS_TOKEN_TTL_MINUTES") {
            Ok(raw) => raw.trim().parse::<i64>().map_err(|_| {
                RustyCredsError::ConfigError(format!(
                    "RUSTY_CREDS_TOKEN_TTL_MINUTES must be a whole number of minutes, got '{}'",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_TOKEN_TTL_MINUTES,
        };

        if ttl_minutes <= 0 {
            return Err(RustyCredsError::ConfigError(
                "RUSTY_CREDS_TOKEN_TTL_MINUTES must be greater than zero".to_string(),
            ));
        }

        let token_ttl = chrono::Duration::try_minutes(ttl_minutes).ok_or_else(|| {
            RustyCredsError::ConfigError(format!(
                "RUSTY_CREDS_TOKEN_TTL_MINUTES is out of range: {}",
                ttl_minutes
            ))
        })?;

        let store_path = env::var("RUSTY_CREDS_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH));

        let bootstrap_admin = match env::var("RUSTY_CREDS_ADMIN_PASSWORD") {
            Ok(password) if !password.is_empty() => {
                let email = env::var("RUSTY_CREDS_ADMIN_EMAIL")
                    .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());
                let full_name = env::var("RUSTY_CREDS_ADMIN_NAME")
                    .unwrap_or_else(|_| DEFAULT_ADMIN_NAME.to_string());
                Some(BootstrapAdmin {
                    email,
                    full_name: Some(full_name),
                    password,
                })
            }
            _ => {
                log::debug!("RUSTY_CREDS_ADMIN_PASSWORD not set, store seeding disabled");
                None
            }
        };

        Self::validate_jwt_secret(&jwt_secret)?;

        Ok(Self {
            jwt_secret,
            token_ttl,
            store_path,
            bootstrap_admin,
        })
    }
}
