//! Credential service facade
//!
//! Bundles the store, the token manager and the security logger behind the
//! call points the API layer uses: authenticate, issue a token, resolve an
//! identity from a token, and gate on roles.

use std::sync::Arc;

use crate::auth::token::{AccessToken, TokenManager};
use crate::auth::user::{User, UserRecord, UserRole};
use crate::auth::{authenticator, gate, identity};
use crate::config::CredsConfig;
use crate::error::{Result, RustyCredsError};
use crate::security_logger::{SecurityEvent, SecurityLogger};
use crate::storage::UserStore;

pub struct AuthService {
    store: Arc<UserStore>,
    tokens: TokenManager,
    security: SecurityLogger,
}

impl AuthService {
    pub fn new(store: Arc<UserStore>, tokens: TokenManager) -> Self {
        Self {
            store,
            tokens,
            security: SecurityLogger::new(),
        }
    }

    /// Open (and seed if needed) the configured store and build the service
    pub fn from_config(config: &CredsConfig) -> Result<Self> {
        let store = UserStore::new(config.store_path.clone(), config.bootstrap_admin.clone());
        let tokens = TokenManager::new(&config.jwt_secret).with_ttl(config.token_ttl);
        let service = Self::new(Arc::new(store), tokens);

        if service.store.ensure_initialized()? {
            service.security.log_event(SecurityEvent::StoreInitialized {
                path: service.store.path().to_path_buf(),
            });
        }

        Ok(service)
    }

    pub fn store(&self) -> &Arc<UserStore> {
        &self.store
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn security(&self) -> &SecurityLogger {
        &self.security
    }

    /// Self-service registration; always creates a student
    pub fn register(&self, email: &str, password: &str, full_name: Option<&str>) -> Result<User> {
        self.create_user(email, password, full_name, UserRole::Student)
    }

    pub fn create_user(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
        role: UserRole,
    ) -> Result<User> {
        let user = self.store.create(email, password, full_name, role)?;
        self.security.log_event(SecurityEvent::UserCreated {
            email: user.email.clone(),
            role: user.role,
        });
        Ok(user)
    }

    pub fn set_disabled(&self, email: &str, disabled: bool) -> Result<User> {
        let user = self.store.set_disabled(email, disabled)?;
        self.security.log_event(SecurityEvent::UserDisabled {
            email: user.email.clone(),
            disabled,
        });
        Ok(user)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<UserRecord> {
        match authenticator::authenticate(&self.store, email, password) {
            Ok(record) => {
                self.security.log_event(SecurityEvent::AuthenticationSuccess {
                    email: record.email.clone(),
                });
                Ok(record)
            }
            Err(e) => {
                if matches!(e, RustyCredsError::AuthFailed) {
                    self.security.log_event(SecurityEvent::AuthenticationFailed {
                        email: email.to_string(),
                    });
                }
                Err(e)
            }
        }
    }

    pub fn issue_token(&self, record: &UserRecord) -> Result<String> {
        let token = self.tokens.issue_token(record)?;
        self.security.log_event(SecurityEvent::TokenIssued {
            email: record.email.clone(),
        });
        Ok(token)
    }

    /// Authenticate and hand back a bearer token
    pub fn login(&self, email: &str, password: &str) -> Result<AccessToken> {
        let record = self.authenticate(email, password)?;
        let token = self.issue_token(&record)?;
        Ok(AccessToken::bearer(token))
    }

    /// Request guard: token -> active user record
    pub fn resolve_identity(&self, token: &str) -> Result<UserRecord> {
        identity::resolve_identity(&self.store, &self.tokens, token).map_err(|e| {
            match &e {
                RustyCredsError::InvalidToken(reason) => {
                    self.security.log_event(SecurityEvent::TokenValidationFailed {
                        reason: reason.clone(),
                    });
                }
                RustyCredsError::ExpiredToken => {
                    self.security.log_event(SecurityEvent::TokenValidationFailed {
                        reason: "expired".to_string(),
                    });
                }
                RustyCredsError::UnknownSubject(email) => {
                    self.security.log_event(SecurityEvent::UnknownSubject {
                        email: email.clone(),
                    });
                }
                RustyCredsError::InactiveUser(email) => {
                    self.security.log_event(SecurityEvent::InactiveUserRejected {
                        email: email.clone(),
                    });
                }
                _ => {}
            }
            e
        })
    }

    pub fn require_role(&self, record: UserRecord, allowed: &[UserRole]) -> Result<UserRecord> {
        if !allowed.contains(&record.role) {
            self.security.log_event(SecurityEvent::PermissionDenied {
                email: record.email.clone(),
                role: record.role,
                required: allowed.to_vec(),
            });
        }
        gate::require_role(record, allowed)
    }

    /// Resolve `token` and gate it on `allowed` in one step
    pub fn authorize(&self, token: &str, allowed: &[UserRole]) -> Result<UserRecord> {
        let record = self.resolve_identity(token)?;
        self.require_role(record, allowed)
    }
}
