// Token configuration constants
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
pub const TOKEN_TYPE_BEARER: &str = "bearer";

// Credential store configuration constants
pub const DEFAULT_STORE_PATH: &str = "users.json";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.edu";
pub const DEFAULT_ADMIN_NAME: &str = "Admin User";

// Secret validation
pub const MIN_SECRET_LENGTH: usize = 32;
