//! Multipart upload acceptance.
//!
//! Shared helper for reading a single uploaded file with a byte cap and an
//! extension whitelist, plus the standalone document-upload endpoint.

use actix_multipart::Multipart;
use actix_web::{post, HttpResponse, Responder};
use futures::StreamExt;

use crate::error::AppError;

/// Hard cap applied to every upload, enforced while streaming.
pub const MAX_UPLOAD_BYTES: usize = 1_000_000;

/// Accepts a word document in the multipart field `upload`.
///
/// ## Responses:
/// - `200 OK`: empty body on success.
/// - `400 Bad Request`: wrong file type, file too large, or malformed multipart.
#[post("/upload")]
pub async fn upload(payload: Multipart) -> Result<impl Responder, AppError> {
    read_upload(
        payload,
        "upload",
        &["doc", "docx"],
        "Please upload a word document",
    )
    .await?;
    Ok(HttpResponse::Ok().finish())
}

/// Streams the multipart payload, returning the bytes of the field named
/// `field_name`. Fields with other names are drained and ignored. The
/// extension filter runs before any bytes are buffered, and the size cap is
/// enforced chunk by chunk so an oversized body is rejected without being
/// held in memory.
pub(crate) async fn read_upload(
    mut payload: Multipart,
    field_name: &str,
    allowed_extensions: &[&str],
    type_error: &str,
) -> Result<Vec<u8>, AppError> {
    while let Some(item) = payload.next().await {
        let mut field = item?;

        if field.name() != field_name {
            while let Some(chunk) = field.next().await {
                chunk?;
            }
            continue;
        }

        let filename = field
            .content_disposition()
            .get_filename()
            .map(str::to_owned)
            .ok_or_else(|| AppError::Upload("Uploaded file has no filename".into()))?;

        if !has_allowed_extension(&filename, allowed_extensions) {
            return Err(AppError::Upload(type_error.to_string()));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::Upload("File too large".into()));
            }
            data.extend_from_slice(&chunk);
        }
        return Ok(data);
    }

    Err(AppError::Upload(format!(
        "Field \"{}\" is required",
        field_name
    )))
}

fn has_allowed_extension(filename: &str, allowed: &[&str]) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, extension)| {
            allowed
                .iter()
                .any(|candidate| extension.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false)
}
