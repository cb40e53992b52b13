use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub title: String,
    /// Storage key of the artifact, relative to the uploads directory.
    pub file_path: String,
    pub file_name: String,
    pub uploaded_by: String,
    pub size_bytes: i64,
    pub sha256: String,
    pub created_at: DateTime<Utc>,
}

/// Metadata for a document row that has not been inserted yet.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub file_path: String,
    pub file_name: String,
    pub uploaded_by: String,
    pub size_bytes: i64,
    pub sha256: String,
    pub created_at: DateTime<Utc>,
}
