pub const SCHEMA: &str = r#"
-- Accounts; role is either 'Student' or 'Admin'
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,          -- argon2id hash with embedded salt
    role TEXT NOT NULL CHECK (role IN ('Student', 'Admin')),
    created_at TEXT DEFAULT (datetime('now'))
);

-- Uploaded documents; the artifact lives under uploaded_files/ keyed by file_path
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    file_path TEXT NOT NULL UNIQUE,  -- generated storage key, never the upload name
    file_name TEXT NOT NULL,         -- name offered on download
    uploaded_by TEXT NOT NULL,       -- username, not a foreign key
    size_bytes INTEGER NOT NULL DEFAULT 0,
    sha256 TEXT NOT NULL DEFAULT '',
    created_at TEXT DEFAULT (datetime('now'))
);
"#;
