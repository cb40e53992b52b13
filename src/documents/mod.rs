mod repository;
mod storage;

pub use repository::DocumentRepository;
pub use storage::{FileStorage, StorageError, StoredFile, UPLOADS_DIR};
