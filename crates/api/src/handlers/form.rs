//! Multipart form reading shared by the upload endpoints.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::{AppError, AppResult};

/// A file part of a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A fully buffered multipart form: text fields and file parts by name.
///
/// A part with a filename is a file; anything else is text. A file part
/// with no bytes (a browser's "no file chosen") counts as absent.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    /// Drain `multipart`. Later parts with the same name replace earlier ones.
    pub async fn read(multipart: &mut Multipart) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name.is_empty() {
                continue;
            }

            if field.file_name().is_some() {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !data.is_empty() {
                    form.files.insert(
                        name,
                        UploadedFile {
                            content_type,
                            data: data.to_vec(),
                        },
                    );
                }
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// Text field `name`, if the form carried it (possibly empty).
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Owned copy of text field `name`.
    pub fn text_owned(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// Remove and return file part `name`.
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}
