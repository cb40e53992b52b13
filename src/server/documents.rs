use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tokio_util::io::ReaderStream;

use crate::auth::RequireSession;
use crate::server::AppState;
use crate::server::response::{ApiError, ApiResponse};
use crate::session::Operation;

const MISSING_UPLOAD_FIELDS: &str = "Please upload a file and provide a title";

struct UploadForm {
    data: Bytes,
    file_name: String,
    title: String,
}

async fn parse_upload_form(multipart: &mut Multipart) -> Result<UploadForm, ApiError> {
    let mut file: Option<(Bytes, String)> = None;
    let mut title: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
                file = Some((data, file_name));
            }
            Some("title") => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Failed to read title: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let (data, file_name) = file.ok_or_else(|| ApiError::bad_request(MISSING_UPLOAD_FIELDS))?;
    let title = title.ok_or_else(|| ApiError::bad_request(MISSING_UPLOAD_FIELDS))?;

    Ok(UploadForm {
        data,
        file_name,
        title,
    })
}

/// GET /documents - List every document
pub async fn list_documents(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let docs = state.portal.list_documents(&auth.session)?;
    Ok(Json(ApiResponse::success(docs)))
}

/// POST /documents - Multipart upload with `file` and `title` fields
pub async fn upload_document(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    // The role is checked before the body is read.
    auth.session.require(Operation::UploadDocument)?;
    let form = parse_upload_form(&mut multipart).await?;

    let doc = state
        .portal
        .upload_document(&auth.session, &form.data, &form.file_name, &form.title)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(doc))))
}

/// GET /documents/{id}/download - Stream the stored bytes
pub async fn download_document(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let (doc, reader, size) = state.portal.open_document(&auth.session, id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));
    headers.insert(
        header::CONTENT_DISPOSITION,
        content_disposition(&doc.file_name),
    );

    let body = Body::from_stream(ReaderStream::new(reader));
    Ok((StatusCode::OK, headers, body).into_response())
}

/// DELETE /documents/{id} - Remove a document; unknown ids are a no-op
pub async fn delete_document(
    auth: RequireSession,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.portal.delete_document(&auth.session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn content_disposition(file_name: &str) -> HeaderValue {
    let safe_filename: String = file_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_' || *c == '.')
        .collect();
    let safe_filename = if safe_filename.is_empty() {
        "document".to_string()
    } else {
        safe_filename
    };

    let value = format!(
        "attachment; filename=\"{safe_filename}\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    );

    HeaderValue::from_str(&value)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"document\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_plain_name() {
        let value = content_disposition("notes.pdf");
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"notes.pdf\"; filename*=UTF-8''notes.pdf"
        );
    }

    #[test]
    fn test_content_disposition_escapes_quotes_and_unicode() {
        let value = content_disposition("résumé \"final\".pdf");
        let value = value.to_str().unwrap();
        assert!(value.starts_with("attachment; filename=\"rsumfinal.pdf\""));
        assert!(value.contains("filename*=UTF-8''r%C3%A9sum%C3%A9%20%22final%22.pdf"));
    }
}
