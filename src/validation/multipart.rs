//! Multipart form collection for product uploads. Parts are read
//! sequentially off the wire; uploads to the blob store happen later and
//! concurrently, once the whole form is in memory.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::multipart::Multipart;

use crate::error::ApiError;

#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

#[derive(Debug, Default)]
pub struct ProductForm {
    pub fields: HashMap<String, String>,
    pub cover: Option<UploadedFile>,
    pub images: Vec<UploadedFile>,
}

/// Drain a multipart request into text fields and uploaded files.
/// Unknown text fields are kept; the schema layer decides what matters.
pub async fn read_product_form(mut multipart: Multipart) -> Result<ProductForm, ApiError> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "images" => {
                let filename = filename_of(field.file_name(), "image");
                let bytes = read_part_bytes(&name, field).await?;
                form.images.push(UploadedFile { filename, bytes });
            }
            "cover" => {
                let filename = filename_of(field.file_name(), "cover");
                let bytes = read_part_bytes(&name, field).await?;
                form.cover = Some(UploadedFile { filename, bytes });
            }
            _ => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Unreadable form field {}: {}", name, e)))?;
                form.fields.insert(name, text);
            }
        }
    }

    Ok(form)
}

async fn read_part_bytes(
    name: &str,
    field: axum::extract::multipart::Field<'_>,
) -> Result<Bytes, ApiError> {
    field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(format!("Unreadable file field {}: {}", name, e)))
}

/// Strip any client-supplied directory components, keeping the basename.
fn filename_of(supplied: Option<&str>, fallback: &str) -> String {
    supplied
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .filter(|name| !name.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
