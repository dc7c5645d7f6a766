use async_trait::async_trait;

use crate::error::RepoError;

/// Storage for uploaded post attachments.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persist the file and return its reference relative to the media root.
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, RepoError>;
}
