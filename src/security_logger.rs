//! Security-focused logging module to track credential events

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::auth::user::UserRole;

/// Types of security events to track
#[derive(Debug, Clone)]
pub enum SecurityEvent {
    // Authentication events
    AuthenticationFailed { email: String },
    AuthenticationSuccess { email: String },
    TokenIssued { email: String },
    TokenValidationFailed { reason: String },

    // Identity events
    UnknownSubject { email: String },
    InactiveUserRejected { email: String },

    // Authorization events
    PermissionDenied { email: String, role: UserRole, required: Vec<UserRole> },

    // Store events
    UserCreated { email: String, role: UserRole },
    UserDisabled { email: String, disabled: bool },
    StoreInitialized { path: PathBuf },
}

impl SecurityEvent {
    /// Get event key for tracking
    fn key(&self) -> &'static str {
        match self {
            SecurityEvent::AuthenticationFailed { .. } => "auth_failed",
            SecurityEvent::AuthenticationSuccess { .. } => "auth_success",
            SecurityEvent::TokenIssued { .. } => "token_issued",
            SecurityEvent::TokenValidationFailed { .. } => "token_validation_failed",
            SecurityEvent::UnknownSubject { .. } => "unknown_subject",
            SecurityEvent::InactiveUserRejected { .. } => "inactive_user",
            SecurityEvent::PermissionDenied { .. } => "permission_denied",
            SecurityEvent::UserCreated { .. } => "user_created",
            SecurityEvent::UserDisabled { .. } => "user_disabled",
            SecurityEvent::StoreInitialized { .. } => "store_initialized",
        }
    }
}

/// Security logger for tracking and alerting on security events
pub struct SecurityLogger {
    event_counts: Mutex<HashMap<&'static str, usize>>,
    alert_thresholds: HashMap<&'static str, usize>,
}

impl Default for SecurityLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityLogger {
    /// Create a new security logger
    pub fn new() -> Self {
        let mut alert_thresholds = HashMap::new();
        // Authentication
        alert_thresholds.insert("auth_failed", 5);
        alert_thresholds.insert("token_validation_failed", 10);

        // Identity and authorization
        alert_thresholds.insert("unknown_subject", 5);
        alert_thresholds.insert("inactive_user", 5);
        alert_thresholds.insert("permission_denied", 20);

        Self {
            event_counts: Mutex::new(HashMap::new()),
            alert_thresholds,
        }
    }

    /// Log a security event
    pub fn log_event(&self, event: SecurityEvent) {
        let key = event.key();

        // Update counters and check for alerts
        {
            let mut counts = self.counts();
            let count = counts.entry(key).or_insert(0);
            *count += 1;

            if let Some(&threshold) = self.alert_thresholds.get(key) {
                if *count >= threshold {
                    log::error!("SECURITY ALERT: {} events of type '{}' detected", count, key);
                    log::error!("Sample event: {:?}", event);
                    *count = 0; // Reset counter after alert
                }
            }
        }

        match event {
            SecurityEvent::AuthenticationFailed { email } => {
                log::warn!("SECURITY: Authentication failed - Email: {}", email);
            }
            SecurityEvent::AuthenticationSuccess { email } => {
                log::info!("SECURITY: Authentication success - Email: {}", email);
            }
            SecurityEvent::TokenIssued { email } => {
                log::debug!("SECURITY: Token issued - Email: {}", email);
            }
            SecurityEvent::TokenValidationFailed { reason } => {
                log::warn!("SECURITY: Token validation failed - Reason: {}", reason);
            }
            SecurityEvent::UnknownSubject { email } => {
                log::warn!("SECURITY: Token subject no longer exists - Email: {}", email);
            }
            SecurityEvent::InactiveUserRejected { email } => {
                log::warn!("SECURITY: Inactive user rejected - Email: {}", email);
            }
            SecurityEvent::PermissionDenied { email, role, required } => {
                log::warn!(
                    "SECURITY: Permission denied - Email: {}, Role: {}, Required: {:?}",
                    email,
                    role,
                    required
                );
            }
            SecurityEvent::UserCreated { email, role } => {
                log::info!("SECURITY: User created - Email: {}, Role: {}", email, role);
            }
            SecurityEvent::UserDisabled { email, disabled } => {
                log::info!("SECURITY: User access changed - Email: {}, Disabled: {}", email, disabled);
            }
            SecurityEvent::StoreInitialized { path } => {
                log::info!("SECURITY: Credential store seeded - Path: {}", path.display());
            }
        }
    }

    /// Get event statistics
    pub fn event_counts(&self) -> HashMap<String, usize> {
        self.counts()
            .iter()
            .map(|(key, count)| (key.to_string(), *count))
            .collect()
    }

    fn counts(&self) -> MutexGuard<'_, HashMap<&'static str, usize>> {
        // Counters stay usable even if a logging thread panicked
        self.event_counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
