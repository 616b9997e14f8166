use crate::{error, Error};
use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};
use bytes::Bytes;
use std::collections::HashMap;

/// A file part of a multipart form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// A fully buffered `multipart/form-data` body. Text parts may repeat (for
/// multi-select inputs); empty file inputs are dropped.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, Upload>,
}

impl MultipartForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn values(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Checkbox semantics: present with a truthy value.
    pub fn flag(&self, name: &str) -> bool {
        matches!(
            self.text(name).map(str::trim),
            Some("on" | "true" | "1" | "yes")
        )
    }

    pub fn take_file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }
}

#[async_trait]
impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await.map_err(|rejection| {
            debug!("rejected multipart body: {rejection}");
            error::MULTIPART_ERROR
        })?;

        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await.map_err(|err| {
            debug!("failed to read multipart field: {err}");
            error::MULTIPART_ERROR
        })? {
            let Some(name) = field.name().map(ToOwned::to_owned) else {
                continue;
            };

            match field.file_name().map(ToOwned::to_owned) {
                Some(file_name) => {
                    let bytes = field.bytes().await.map_err(|err| {
                        debug!("failed to read multipart file: {err}");
                        error::MULTIPART_ERROR
                    })?;

                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }

                    form.files.insert(name, Upload { file_name, bytes });
                }
                None => {
                    let text = field.text().await.map_err(|err| {
                        debug!("failed to read multipart text: {err}");
                        error::MULTIPART_ERROR
                    })?;

                    form.fields.entry(name).or_default().push(text);
                }
            }
        }

        Ok(form)
    }
}
