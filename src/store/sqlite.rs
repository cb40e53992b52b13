use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const USER_COLUMNS: &str = "id, username, password, role, created_at";
const DOCUMENT_COLUMNS: &str =
    "id, title, file_path, file_name, uploaded_by, size_bytes, sha256, created_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get(3)?;
    let role = Role::parse(&role).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("invalid role '{role}'").into(),
        )
    })?;

    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        role,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        title: row.get(1)?,
        file_path: row.get(2)?,
        file_name: row.get(3)?,
        uploaded_by: row.get(4)?,
        size_bytes: row.get(5)?,
        sha256: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, username: &str, password_hash: &str, role: Role) -> Result<User> {
        let conn = self.conn();
        let created_at = Utc::now();

        let result = conn.execute(
            "INSERT INTO users (username, password, role, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                username,
                password_hash,
                role.as_str(),
                format_datetime(&created_at)
            ],
        );

        match result {
            Ok(_) => Ok(User {
                id: conn.last_insert_rowid(),
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                role,
                created_at,
            }),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::DuplicateUsername(username.to_string()))
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
        let rows = stmt.query_map([], user_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Document operations

    fn create_document(&self, doc: &NewDocument) -> Result<Document> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO documents (title, file_path, file_name, uploaded_by, size_bytes, sha256, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                doc.title,
                doc.file_path,
                doc.file_name,
                doc.uploaded_by,
                doc.size_bytes,
                doc.sha256,
                format_datetime(&doc.created_at),
            ],
        )?;

        Ok(Document {
            id: conn.last_insert_rowid(),
            title: doc.title.clone(),
            file_path: doc.file_path.clone(),
            file_name: doc.file_name.clone(),
            uploaded_by: doc.uploaded_by.clone(),
            size_bytes: doc.size_bytes,
            sha256: doc.sha256.clone(),
            created_at: doc.created_at,
        })
    }

    fn get_document(&self, id: i64) -> Result<Option<Document>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"),
            params![id],
            document_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_documents(&self) -> Result<Vec<Document>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare(&format!("SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY id"))?;
        let rows = stmt.query_map([], document_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_document(&self, id: i64) -> Result<Option<Document>> {
        let conn = self.conn();
        let doc = conn
            .query_row(
                &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"),
                params![id],
                document_from_row,
            )
            .optional()?;

        if doc.is_some() {
            conn.execute("DELETE FROM documents WHERE id = ?1", params![id])?;
        }
        Ok(doc)
    }
}
