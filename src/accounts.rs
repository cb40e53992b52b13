use std::sync::Arc;

use tracing::{debug, info};

use crate::auth::PasswordHasher;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Role, User};

/// Creates and authenticates user accounts.
pub struct AccountDirectory {
    store: Arc<dyn Store>,
    hasher: PasswordHasher,
}

impl AccountDirectory {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            hasher: PasswordHasher::new(),
        }
    }

    /// Registers a new account.
    ///
    /// The insert itself enforces username uniqueness, so two concurrent
    /// registrations of the same name cannot both succeed.
    pub fn register(&self, username: &str, password: &str, role: Role) -> Result<User> {
        if username.is_empty() || password.is_empty() {
            return Err(Error::BadRequest("Please fill in all fields".to_string()));
        }

        let hash = self.hasher.hash(password)?;
        let user = self.store.create_user(username, &hash, role)?;

        info!("Registered {} account '{}'", user.role, user.username);
        Ok(user)
    }

    /// Returns the account only if username, password and role all match
    /// exactly. An unknown user, a wrong password and a wrong role are
    /// indistinguishable to the caller.
    pub fn authenticate(&self, username: &str, password: &str, role: Role) -> Result<Option<User>> {
        let Some(user) = self.store.get_user_by_username(username)? else {
            debug!("Authentication failed: no account '{username}'");
            return Ok(None);
        };

        if user.role != role {
            debug!("Authentication failed: '{username}' is not {role}");
            return Ok(None);
        }

        if !self.hasher.verify(password, &user.password_hash)? {
            debug!("Authentication failed: bad password for '{username}'");
            return Ok(None);
        }

        Ok(Some(user))
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        self.store.list_users()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use tempfile::TempDir;

    fn directory(temp: &TempDir) -> AccountDirectory {
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        AccountDirectory::new(Arc::new(store))
    }

    #[test]
    fn test_register_twice_fails_and_keeps_first() {
        let temp = TempDir::new().unwrap();
        let dir = directory(&temp);

        dir.register("alice", "pw", Role::Student).unwrap();
        let err = dir.register("alice", "other", Role::Admin).unwrap_err();
        assert!(matches!(err, Error::DuplicateUsername(_)));

        assert!(dir.authenticate("alice", "pw", Role::Student).unwrap().is_some());
        assert!(dir.authenticate("alice", "other", Role::Admin).unwrap().is_none());
    }

    #[test]
    fn test_register_requires_username_and_password() {
        let temp = TempDir::new().unwrap();
        let dir = directory(&temp);

        assert!(matches!(
            dir.register("", "pw", Role::Student),
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(
            dir.register("alice", "", Role::Student),
            Err(Error::BadRequest(_))
        ));
        assert!(dir.list_users().unwrap().is_empty());
    }

    #[test]
    fn test_password_is_not_stored_verbatim() {
        let temp = TempDir::new().unwrap();
        let dir = directory(&temp);

        let user = dir.register("alice", "pw", Role::Student).unwrap();
        assert_ne!(user.password_hash, "pw");
    }

    #[test]
    fn test_authenticate_requires_every_field_to_match() {
        let temp = TempDir::new().unwrap();
        let dir = directory(&temp);
        dir.register("alice", "pw", Role::Student).unwrap();

        let user = dir.authenticate("alice", "pw", Role::Student).unwrap().unwrap();
        assert_eq!(user.username, "alice");

        assert!(dir.authenticate("bob", "pw", Role::Student).unwrap().is_none());
        assert!(dir.authenticate("alice", "PW", Role::Student).unwrap().is_none());
        assert!(dir.authenticate("alice", "pw", Role::Admin).unwrap().is_none());
        assert!(dir.authenticate("Alice", "pw", Role::Student).unwrap().is_none());
    }

    #[test]
    fn test_unhashed_stored_password_never_authenticates() {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        store.create_user("legacy", "pw", Role::Student).unwrap();
        let dir = AccountDirectory::new(Arc::new(store));

        assert!(dir.authenticate("legacy", "pw", Role::Student).unwrap().is_none());
    }

    #[test]
    fn test_admin_registration_and_login() {
        let temp = TempDir::new().unwrap();
        let dir = directory(&temp);

        let bob = dir.register("bob", "x", Role::Admin).unwrap();

        let found = dir.authenticate("bob", "x", Role::Admin).unwrap().unwrap();
        assert_eq!(found.id, bob.id);
        assert_eq!(found.role, Role::Admin);

        assert!(dir.authenticate("bob", "wrong", Role::Admin).unwrap().is_none());
    }
}
