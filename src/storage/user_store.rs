//! File-backed credential store
//!
//! The whole user table lives in one JSON document keyed by email. Every read
//! loads the full document and every mutation rewrites it.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::auth::password::hash_password;
use crate::auth::user::{User, UserRecord, UserRole};
use crate::config::{BootstrapAdmin, CredsConfig};
use crate::error::{Result, RustyCredsError};

/// Email -> record mapping, the in-memory form of the document
pub type UserTable = BTreeMap<String, UserRecord>;

pub struct UserStore {
    path: PathBuf,
    bootstrap: Option<BootstrapAdmin>,
    // Serializes load-modify-save sequences made through this handle
    write_lock: Mutex<()>,
}

impl UserStore {
    /// Creates a store handle. No I/O happens until the first call
    pub fn new(path: impl Into<PathBuf>, bootstrap: Option<BootstrapAdmin>) -> Self {
        Self {
            path: path.into(),
            bootstrap,
            write_lock: Mutex::new(()),
        }
    }

    /// Creates a store handle from configuration and seeds it if needed
    pub fn open(config: &CredsConfig) -> Result<Self> {
        let store = Self::new(config.store_path.clone(), config.bootstrap_admin.clone());
        store.ensure_initialized()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the seed document if none exists. Returns true when it did
    pub fn ensure_initialized(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        let _guard = self.write_lock.lock()?;
        self.initialize_locked()
    }

    /// Returns every stored record
    pub fn load_all(&self) -> Result<UserTable> {
        self.ensure_initialized()?;
        self.read_document()
    }

    /// Replaces the whole document with `users`
    pub fn save_all(&self, users: &UserTable) -> Result<()> {
        let _guard = self.write_lock.lock()?;
        self.write_document(users)
    }

    /// Looks up a record by exact email
    pub fn find(&self, email: &str) -> Result<Option<UserRecord>> {
        Ok(self.load_all()?.remove(email))
    }

    /// Registers a new user. Fails if the email is taken
    pub fn create(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
        role: UserRole,
    ) -> Result<User> {
        let record = self.update(|users| {
            if users.contains_key(email) {
                return Err(RustyCredsError::DuplicateUser(email.to_string()));
            }

            let record = UserRecord {
                email: email.to_string(),
                full_name: full_name.map(str::to_string),
                hashed_password: hash_password(password)?,
                role,
                disabled: false,
            };
            users.insert(email.to_string(), record.clone());
            Ok(record)
        })?;

        log::info!("Created user {} with role {}", record.email, record.role);
        Ok(record.public())
    }

    /// Flips the disabled flag of an existing user
    pub fn set_disabled(&self, email: &str, disabled: bool) -> Result<User> {
        let record = self.update(|users| {
            let record = users
                .get_mut(email)
                .ok_or_else(|| RustyCredsError::UserNotFound(email.to_string()))?;
            record.disabled = disabled;
            Ok(record.clone())
        })?;

        log::info!("User {} disabled={}", record.email, record.disabled);
        Ok(record.public())
    }

    /// Deletes a user. Returns false if there was nothing to delete
    pub fn remove(&self, email: &str) -> Result<bool> {
        let removed = self.update(|users| Ok(users.remove(email).is_some()))?;
        if removed {
            log::info!("Removed user {}", email);
        }
        Ok(removed)
    }

    /// Runs one load-modify-save cycle under the write lock.
    /// Nothing is written when `mutate` fails.
    fn update<T, F>(&self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut UserTable) -> Result<T>,
    {
        let _guard = self.write_lock.lock()?;
        if !self.path.exists() {
            self.initialize_locked()?;
        }

        let mut users = self.read_document()?;
        let outcome = mutate(&mut users)?;
        self.write_document(&users)?;
        Ok(outcome)
    }

    /// Caller must hold the write lock
    fn initialize_locked(&self) -> Result<bool> {
        // Another caller may have won the race for the lock
        if self.path.exists() {
            return Ok(false);
        }

        let admin = self.bootstrap.as_ref().ok_or_else(|| {
            RustyCredsError::ConfigError(format!(
                "Credential store {} does not exist and no bootstrap admin password is configured \
                 (set RUSTY_CREDS_ADMIN_PASSWORD)",
                self.path.display()
            ))
        })?;

        let mut users = UserTable::new();
        users.insert(
            admin.email.clone(),
            UserRecord {
                email: admin.email.clone(),
                full_name: admin.full_name.clone(),
                hashed_password: hash_password(&admin.password)?,
                role: UserRole::Admin,
                disabled: false,
            },
        );

        self.write_document(&users)?;
        log::info!(
            "Initialized credential store {} with admin {}",
            self.path.display(),
            admin.email
        );
        Ok(true)
    }

    fn read_document(&self) -> Result<UserTable> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            RustyCredsError::StorageError(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let users: UserTable = serde_json::from_str(&raw).map_err(|e| {
            RustyCredsError::StorageError(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })?;

        check_keys(&users)?;
        Ok(users)
    }

    /// Write to a sibling temp file then rename over the document
    fn write_document(&self, users: &UserTable) -> Result<()> {
        check_keys(users)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                RustyCredsError::StorageError(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let body = serde_json::to_vec_pretty(users).map_err(|e| {
            RustyCredsError::StorageError(format!("Failed to serialize users: {}", e))
        })?;

        let tmp_path = self.temp_path();
        let write_tmp = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&body)?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        };

        write_tmp().map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            RustyCredsError::StorageError(format!(
                "Failed to write {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "users.json".into());
        // Unique per write so concurrent writers never share a temp file
        name.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }
}

/// Every entry must be keyed by its own email, which also makes emails unique
fn check_keys(users: &UserTable) -> Result<()> {
    match users.iter().find(|(key, record)| **key != record.email) {
        Some((key, record)) => Err(RustyCredsError::StorageError(format!(
            "User table key '{}' does not match record email '{}'",
            key, record.email
        ))),
        None => Ok(()),
    }
}
