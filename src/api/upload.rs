//! Multipart document form parsing.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart},
    http::StatusCode,
};
use tracing::error;

use crate::error::{CatalogError, Result};

/// An uploaded file part.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Raw document form fields. Unknown fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct DocumentForm {
    pub name: Option<String>,
    pub folder: Option<String>,
    pub topic: Option<String>,
    pub file: Option<UploadedFile>,
}

impl DocumentForm {
    /// Reads every part of the multipart body.
    pub async fn read(
        multipart: std::result::Result<Multipart, MultipartRejection>,
    ) -> Result<Self> {
        let mut multipart = multipart.map_err(|e| CatalogError::Validation(e.body_text()))?;
        let mut form = DocumentForm::default();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => return Err(multipart_error(e)),
            };

            match field.name() {
                Some("name") => form.name = Some(field.text().await.map_err(multipart_error)?),
                Some("folder") => form.folder = Some(field.text().await.map_err(multipart_error)?),
                Some("topic") => form.topic = Some(field.text().await.map_err(multipart_error)?),
                Some("file") => {
                    let filename = field
                        .file_name()
                        .map(str::to_string)
                        .unwrap_or_default();
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    form.file = Some(UploadedFile { filename, bytes });
                }
                _ => continue,
            }
        }

        Ok(form)
    }

    /// `folder` as an id. Absent or blank yields None.
    pub fn folder_id(&self) -> Result<Option<u64>> {
        match self.folder.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                CatalogError::Validation(format!(
                    "folder: incorrect type, expected pk value, received \"{}\"",
                    raw
                ))
            }),
        }
    }

    /// `folder` as a required id.
    pub fn required_folder_id(&self) -> Result<u64> {
        self.folder_id()?
            .ok_or_else(|| CatalogError::Validation("folder: this field is required".to_string()))
    }

    /// `topic` as an update: absent keeps, blank clears, an id sets.
    pub fn topic_id(&self) -> Result<Option<Option<u64>>> {
        match self.topic.as_deref().map(str::trim) {
            None => Ok(None),
            Some("") => Ok(Some(None)),
            Some(raw) => raw.parse().map(|id| Some(Some(id))).map_err(|_| {
                CatalogError::Validation(format!(
                    "topic: incorrect type, expected pk value, received \"{}\"",
                    raw
                ))
            }),
        }
    }

    /// The uploaded file, rejecting empty submissions.
    pub fn file(&self) -> Result<Option<&UploadedFile>> {
        match &self.file {
            None => Ok(None),
            Some(file) if file.bytes.is_empty() => Err(CatalogError::Validation(
                "file: the submitted file is empty".to_string(),
            )),
            Some(file) => Ok(Some(file)),
        }
    }

    pub fn required_file(&self) -> Result<&UploadedFile> {
        self.file()?
            .ok_or_else(|| CatalogError::Validation("file: no file was submitted".to_string()))
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> CatalogError {
    let status = err.status();
    error!(status = status.as_u16(), error = %err, "failed to read multipart payload");

    if status == StatusCode::PAYLOAD_TOO_LARGE {
        CatalogError::Validation("upload exceeds the maximum allowed size".to_string())
    } else {
        CatalogError::Validation(err.body_text())
    }
}
