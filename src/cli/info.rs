use serde::Serialize;

use crate::documents::{FileStorage, UPLOADS_DIR};
use crate::store::Store;
use crate::types::{Document, Role};

use super::init_store;
use super::pickers::format_size;

#[derive(Serialize)]
struct UserOutput {
    id: i64,
    username: String,
    role: Role,
    created_at: String,
}

#[derive(Serialize)]
struct DocumentOutput {
    id: i64,
    title: String,
    file_name: String,
    uploaded_by: String,
    size_bytes: i64,
    sha256: String,
    created_at: String,
    /// False when the row's file is gone from the uploads directory.
    present: bool,
}

#[derive(Serialize)]
struct DetailedInfo {
    users: Vec<UserOutput>,
    documents: Vec<DocumentOutput>,
}

fn document_output(doc: &Document, present: bool) -> DocumentOutput {
    DocumentOutput {
        id: doc.id,
        title: doc.title.clone(),
        file_name: doc.file_name.clone(),
        uploaded_by: doc.uploaded_by.clone(),
        size_bytes: doc.size_bytes,
        sha256: doc.sha256.clone(),
        created_at: doc.created_at.to_rfc3339(),
        present,
    }
}

pub async fn run_info(data_dir: String, json: bool) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;
    let storage = FileStorage::new(std::path::Path::new(&data_dir));

    let users = store.list_users()?;
    let documents = store.list_documents()?;

    let mut present = Vec::with_capacity(documents.len());
    for doc in &documents {
        // A key that fails validation cannot name a stored file.
        present.push(storage.exists(&doc.file_path).await.unwrap_or(false));
    }

    if json {
        let info = DetailedInfo {
            users: users
                .iter()
                .map(|u| UserOutput {
                    id: u.id,
                    username: u.username.clone(),
                    role: u.role,
                    created_at: u.created_at.to_rfc3339(),
                })
                .collect(),
            documents: documents
                .iter()
                .zip(&present)
                .map(|(d, &present)| document_output(d, present))
                .collect(),
        };

        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let admins = users.iter().filter(|u| u.role == Role::Admin).count();
    let missing = present.iter().filter(|&&p| !p).count();
    let total_bytes: i64 = documents.iter().map(|d| d.size_bytes).sum();

    println!();
    println!("Document Portal Status");
    println!("{}", "─".repeat(22));
    println!(
        "Users:      {} ({} admin, {} student)",
        users.len(),
        admins,
        users.len() - admins
    );
    println!(
        "Documents:  {} ({})",
        documents.len(),
        format_size(total_bytes)
    );
    if missing > 0 {
        println!("Missing:    {missing} file(s) not found in {UPLOADS_DIR}/");
    }
    println!();

    Ok(())
}
