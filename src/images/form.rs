use std::collections::HashMap;

use axum::{extract::Multipart, http::StatusCode};
use bytes::Bytes;
use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::images::services::IMAGE_RULES;

pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
}

/// A fully buffered multipart body: text fields by name plus file parts.
#[derive(Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadItem>,
}

impl MultipartForm {
    pub async fn read(mut mp: Multipart) -> AppResult<Self> {
        let mut form = MultipartForm::default();
        loop {
            let field = match mp.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => return Err(multipart_error(e.status(), e.body_text())),
            };
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".into());
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e.status(), e.body_text()))?;
                // browsers send an empty part when no file was picked
                if body.is_empty() {
                    continue;
                }
                form.files.insert(
                    name,
                    UploadItem {
                        body,
                        content_type,
                        file_name,
                    },
                );
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e.status(), e.body_text()))?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadItem> {
        self.files.remove(name)
    }
}

fn multipart_error(status: StatusCode, detail: String) -> AppError {
    warn!(%status, %detail, "multipart read failed");
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::bad_request(IMAGE_RULES)
    } else {
        AppError::bad_request(format!("Malformed form data: {detail}"))
    }
}
