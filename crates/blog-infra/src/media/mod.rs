//! Attachment storage on the local filesystem.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use blog_core::error::RepoError;
use blog_core::ports::MediaStore;

const UPLOAD_DIR: &str = "uploads";

/// Stores uploads under `<root>/uploads/<uuid>-<sanitized name>`.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a stored reference back to a path inside the root.
    ///
    /// Returns `None` for anything that could escape the root.
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let relative = Path::new(reference);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || reference.is_empty() {
            return None;
        }
        Some(self.root.join(relative))
    }
}

/// Keep the final path segment and replace anything unusual with `_`.
fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, RepoError> {
        let reference = format!(
            "{}/{}-{}",
            UPLOAD_DIR,
            Uuid::new_v4().simple(),
            sanitize_file_name(file_name)
        );
        let path = self.root.join(&reference);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepoError::Query(format!("media directory: {}", e)))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| RepoError::Query(format!("media write: {}", e)))?;

        tracing::debug!(reference = %reference, size = bytes.len(), "Attachment stored");
        Ok(reference)
    }
}
