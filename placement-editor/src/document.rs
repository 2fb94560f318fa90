//! Reading and exporting the canonical config document.
//!
//! The document is fetched fresh for every operation because it may be edited
//! (by pasting an export back into it) while the editor is running. There is no
//! locking and no conflict detection: whatever the document says at the moment
//! of the call wins.

use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::error::{DocumentError, EditorError};
use crate::result::{DocumentResult, EditorResult};
use crate::store::TransformStore;
use log::{debug, info};
use reqwest::header::CACHE_CONTROL;
use shared::{ConfigDocument, ObjectKey, ObjectTransform};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    File(PathBuf),
    Http(String),
}

impl DocumentSource {
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DocumentSource::Http(location.to_string())
        } else {
            DocumentSource::File(PathBuf::from(location))
        }
    }
}

pub struct DocumentIo {
    source: DocumentSource,
    client: reqwest::Client,
    write_back: bool,
    fetches: AtomicU64,
}

impl DocumentIo {
    pub fn new(source: DocumentSource, write_back: bool) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
            write_back,
            fetches: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(DocumentSource::parse(&config.document), config.write_back)
    }

    pub fn source(&self) -> &DocumentSource {
        &self.source
    }

    pub async fn read_document(&self) -> DocumentResult<ConfigDocument> {
        let text = match &self.source {
            DocumentSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| DocumentError::ReadFile(path.clone(), e))?,
            DocumentSource::Http(url) => {
                // A fresh query value on every request so no cache can answer it,
                // even for two requests within the same millisecond.
                let fetch = self.fetches.fetch_add(1, Ordering::Relaxed);
                let version = format!("{}-{}", shared::now_millis(), fetch);
                let response = self
                    .client
                    .get(url.as_str())
                    .query(&[("v", version)])
                    .header(CACHE_CONTROL, "no-cache")
                    .send()
                    .await?;
                if !response.status().is_success() {
                    return Err(DocumentError::Status(response.status()));
                }
                response.text().await?
            }
        };
        Ok(ConfigDocument::parse(&text)?)
    }

    /// The whole document with one section replaced by `transform`, pretty
    /// printed so it can be pasted over the document file as is.
    pub async fn export_object(&self, transform: &ObjectTransform) -> EditorResult<String> {
        let mut document = self.read_document().await?;
        document.set_section(transform.clone());
        let text = document.to_pretty_string().map_err(DocumentError::Json)?;
        if self.write_back {
            if let DocumentSource::File(path) = &self.source {
                tokio::fs::write(path, &text)
                    .await
                    .map_err(|e| EditorError::WriteBackFailed(path.clone(), e))?;
                info!("Wrote {} back to {}", transform.key(), path.display());
            }
        }
        Ok(text)
    }

    /// Exports and places the text on the clipboard. Returns the exported text.
    pub async fn copy_object(
        &self,
        transform: &ObjectTransform,
        clipboard: &Clipboard,
    ) -> EditorResult<String> {
        let text = self.export_object(transform).await?;
        clipboard.write_text(&text).await?;
        Ok(text)
    }

    pub async fn import_object(&self, key: ObjectKey) -> EditorResult<ObjectTransform> {
        let document = self.read_document().await?;
        document.section(key).ok_or(EditorError::KeyNotFound(key))
    }

    /// Puts the document's current value for `key` back into the store. On any
    /// failure the store is not touched.
    pub async fn reset_object(
        &self,
        key: ObjectKey,
        store: &mut TransformStore,
    ) -> EditorResult<ObjectTransform> {
        let transform = self.import_object(key).await?;
        store.replace_all(transform.clone());
        Ok(transform)
    }

    /// Replaces every object the document has a section for. Returns the keys
    /// that were loaded; objects without a section keep their current value.
    pub async fn load_into(&self, store: &mut TransformStore) -> DocumentResult<Vec<ObjectKey>> {
        let document = self.read_document().await?;
        let mut loaded = vec![];
        for key in ObjectKey::ALL.iter().copied() {
            match document.section(key) {
                Some(transform) => {
                    store.replace_all(transform);
                    loaded.push(key);
                }
                None => debug!("Document has no {} section", key),
            }
        }
        Ok(loaded)
    }
}
