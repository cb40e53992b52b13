use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::fs::File;
use tokio::io::BufReader;
use tracing::{debug, info, warn};

use super::storage::FileStorage;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Document, NewDocument};

const DEFAULT_FILE_NAME: &str = "document";

/// Document metadata in the store plus the artifacts on disk.
pub struct DocumentRepository {
    store: Arc<dyn Store>,
    storage: FileStorage,
}

impl DocumentRepository {
    pub fn new(store: Arc<dyn Store>, data_dir: &Path) -> Self {
        Self {
            store,
            storage: FileStorage::new(data_dir),
        }
    }

    #[must_use]
    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    /// Stores the bytes under a fresh key, then records the metadata row.
    pub async fn upload(
        &self,
        data: &[u8],
        file_name: &str,
        title: &str,
        uploaded_by: &str,
    ) -> Result<Document> {
        if title.trim().is_empty() {
            return Err(Error::BadRequest(
                "Please upload a file and provide a title".to_string(),
            ));
        }

        let stored = self.storage.put(data).await?;

        let new_doc = NewDocument {
            title: title.to_string(),
            file_path: stored.key.clone(),
            file_name: display_name(file_name),
            uploaded_by: uploaded_by.to_string(),
            size_bytes: stored.size,
            sha256: stored.sha256,
            created_at: Utc::now(),
        };

        let doc = match self.store.create_document(&new_doc) {
            Ok(doc) => doc,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&stored.key).await {
                    warn!("Failed to remove artifact {} after insert error: {cleanup}", stored.key);
                }
                return Err(e);
            }
        };

        info!(
            "Uploaded document {} '{}' ({} bytes) by {}",
            doc.id, doc.title, doc.size_bytes, doc.uploaded_by
        );
        Ok(doc)
    }

    /// All documents in insertion order.
    pub fn list(&self) -> Result<Vec<Document>> {
        self.store.list_documents()
    }

    /// Opens the artifact behind a document for reading.
    pub async fn open(&self, id: i64) -> Result<(Document, BufReader<File>, i64)> {
        let doc = self.store.get_document(id)?.ok_or(Error::NotFound)?;
        let (reader, size) = self.storage.get(&doc.file_path).await?;
        Ok((doc, reader, size))
    }

    /// Removes the metadata row, then the artifact on a best-effort basis.
    ///
    /// Deleting an id that does not exist is a no-op and returns `None`.
    pub async fn delete(&self, id: i64) -> Result<Option<Document>> {
        let Some(doc) = self.store.delete_document(id)? else {
            debug!("Delete of unknown document {id} ignored");
            return Ok(None);
        };

        match self.storage.delete(&doc.file_path).await {
            Ok(true) => {}
            Ok(false) => debug!("Artifact for document {} was already gone", doc.id),
            Err(e) => warn!("Failed to remove artifact for document {}: {e}", doc.id),
        }

        info!("Deleted document {} '{}'", doc.id, doc.title);
        Ok(Some(doc))
    }
}

/// Reduces a client-supplied file name to its last path component.
fn display_name(file_name: &str) -> String {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        DEFAULT_FILE_NAME.to_string()
    } else {
        name.to_string()
    }
}
