use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufReader};
use uuid::Uuid;

pub const UPLOADS_DIR: &str = "uploaded_files";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found")]
    NotFound,
    #[error("invalid storage key")]
    InvalidKey,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    fn from_io(e: std::io::Error) -> Self {
        if e.kind() == ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(e)
        }
    }
}

impl From<StorageError> for crate::error::Error {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound => Self::NotFound,
            StorageError::InvalidKey => Self::BadRequest(e.to_string()),
            StorageError::Io(e) => Self::Io(e),
        }
    }
}

/// Result of writing an artifact.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub key: String,
    pub size: i64,
    pub sha256: String,
}

/// Uploaded artifacts on local disk, each named by a generated key so that
/// two uploads never share a path.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            base_path: data_dir.join(UPLOADS_DIR),
        }
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.base_path.join(&key[0..2]).join(key)
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join("tmp")
            .join(Uuid::new_v4().to_string())
    }

    pub async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        Ok(fs::try_exists(self.object_path(key)).await?)
    }

    pub async fn get(&self, key: &str) -> Result<(BufReader<File>, i64), StorageError> {
        validate_key(key)?;
        let path = self.object_path(key);
        let file = File::open(&path).await.map_err(StorageError::from_io)?;

        let metadata = file.metadata().await?;
        let size = metadata.len() as i64;

        Ok((BufReader::new(file), size))
    }

    /// Writes `data` under a new key. The bytes land in a temp file first and
    /// are renamed into place, so a reader never sees a partial artifact.
    pub async fn put(&self, data: &[u8]) -> Result<StoredFile, StorageError> {
        let key = Uuid::new_v4().to_string();

        let mut hasher = Sha256::new();
        hasher.update(data);
        let sha256 = hex::encode(hasher.finalize());

        let temp_path = self.temp_path();
        if let Some(parent) = temp_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut temp_file = File::create(&temp_path).await?;
        temp_file.write_all(data).await?;
        temp_file.sync_all().await?;

        let final_path = self.object_path(&key);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::rename(&temp_path, &final_path).await?;

        Ok(StoredFile {
            key,
            size: data.len() as i64,
            sha256,
        })
    }

    /// Removes an artifact. Returns false if it was already gone.
    pub async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        let path = self.object_path(key);

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    match Uuid::try_parse(key) {
        Ok(uuid) if uuid.hyphenated().to_string() == key => Ok(()),
        _ => Err(StorageError::InvalidKey),
    }
}
