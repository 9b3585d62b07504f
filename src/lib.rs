//! Rusty Creds - credential storage and bearer tokens for small web APIs
//!
//! This library persists user records in a single JSON document, verifies
//! argon2 password hashes, issues and validates HS256 JWTs, and gates
//! operations on user roles.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod security_logger;
pub mod service;
pub mod storage;

// Re-export main components
pub use auth::{AccessToken, Claims, TokenManager, User, UserRecord, UserRole};
pub use config::{BootstrapAdmin, CredsConfig};
pub use error::{Result, RustyCredsError};
pub use service::AuthService;
pub use storage::UserStore;
