mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    /// Creates the tables if they do not exist yet. Idempotent.
    fn initialize(&self) -> Result<()>;

    // User operations

    /// Inserts a user. Fails with `DuplicateUsername` when the unique
    /// constraint on `username` rejects the row.
    fn create_user(&self, username: &str, password_hash: &str, role: Role) -> Result<User>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    fn list_users(&self) -> Result<Vec<User>>;

    // Document operations
    fn create_document(&self, doc: &NewDocument) -> Result<Document>;
    fn get_document(&self, id: i64) -> Result<Option<Document>>;
    fn list_documents(&self) -> Result<Vec<Document>>;
    /// Removes the row and returns it, or `None` when no row had that id.
    fn delete_document(&self, id: i64) -> Result<Option<Document>>;
}
