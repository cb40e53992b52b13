use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Document;

use super::credentials::load_credentials;
use super::http_client::ApiClient;
use super::pickers::{
    confirm_action, format_relative_time, format_size, get_or_prompt_text, pick_document,
};

fn client() -> anyhow::Result<ApiClient> {
    let creds = load_credentials()?;
    ApiClient::new(&creds)
}

fn resolve_document(
    client: &ApiClient,
    id: Option<i64>,
    non_interactive: bool,
) -> anyhow::Result<Option<Document>> {
    let documents: Vec<Document> = client.get("/documents")?;

    match id {
        Some(id) => documents
            .into_iter()
            .find(|d| d.id == id)
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("Document {id} not found")),
        None if non_interactive => anyhow::bail!("Document ID is required in non-interactive mode"),
        None => pick_document(documents),
    }
}

pub fn run_docs_list(json: bool) -> anyhow::Result<()> {
    let client = client()?;
    let documents: Vec<Document> = client.get("/documents")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
        return Ok(());
    }

    if documents.is_empty() {
        println!("No documents available.");
        return Ok(());
    }

    println!();
    println!(
        "{:<6} {:<30} {:<24} {:>10}  {:<12} UPLOADED",
        "ID", "TITLE", "FILE", "SIZE", "BY"
    );
    for doc in &documents {
        println!(
            "{:<6} {:<30} {:<24} {:>10}  {:<12} {}",
            doc.id,
            doc.title,
            doc.file_name,
            format_size(doc.size_bytes),
            doc.uploaded_by,
            format_relative_time(&doc.created_at)
        );
    }
    println!();

    Ok(())
}

pub fn run_docs_upload(
    file: PathBuf,
    title: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let client = client()?;

    let data = fs::read(&file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", file.display()))?;
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", file.display()))?
        .to_string();

    let Some(title) = get_or_prompt_text(title, "Title", "title", non_interactive)? else {
        println!("Cancelled.");
        return Ok(());
    };

    let doc: Document = client.upload("/documents", &file_name, data, &title)?;

    println!();
    println!(
        "Uploaded \"{}\" as document #{} ({})",
        doc.title,
        doc.id,
        format_size(doc.size_bytes)
    );
    println!();

    Ok(())
}

pub fn run_docs_download(id: Option<i64>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let client = client()?;

    let Some(doc) = resolve_document(&client, id, false)? else {
        return Ok(());
    };

    let data = client.download(&format!("/documents/{}/download", doc.id))?;
    let output = output.unwrap_or_else(|| default_output(&doc.file_name));
    fs::write(&output, &data)?;

    println!();
    println!(
        "Saved \"{}\" to {} ({})",
        doc.title,
        output.display(),
        format_size(data.len() as i64)
    );
    println!();

    Ok(())
}

pub fn run_docs_delete(id: Option<i64>, non_interactive: bool, yes: bool) -> anyhow::Result<()> {
    let client = client()?;

    let Some(doc) = resolve_document(&client, id, non_interactive)? else {
        return Ok(());
    };

    let confirmed = confirm_action(
        &format!("Delete document #{} \"{}\"?", doc.id, doc.title),
        yes,
        non_interactive,
    )?;

    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    client.delete(&format!("/documents/{}", doc.id))?;

    println!();
    println!("Deleted document #{} \"{}\"", doc.id, doc.title);
    println!();

    Ok(())
}

/// Saves into the working directory under the uploaded file's base name.
fn default_output(file_name: &str) -> PathBuf {
    Path::new(file_name)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("document"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_strips_directories() {
        assert_eq!(default_output("notes.pdf"), PathBuf::from("notes.pdf"));
        assert_eq!(default_output("../../etc/passwd"), PathBuf::from("passwd"));
        assert_eq!(default_output(""), PathBuf::from("document"));
    }
}
