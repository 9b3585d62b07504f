//! Authentication and authorization module

pub mod authenticator;
pub mod gate;
pub mod identity;
pub mod password;
pub mod token;
pub mod user;

// Re-export main components
pub use authenticator::authenticate;
pub use gate::require_role;
pub use identity::resolve_identity;
pub use password::{hash_password, verify_password};
pub use token::{extract_bearer_token, AccessToken, Claims, TokenManager};
pub use user::{User, UserRecord, UserRole};
