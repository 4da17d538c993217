/// Filesystem-backed corpus loader

use std::path::Path;

use async_trait::async_trait;

use crate::knowledge::{KnowledgeBaseLoader, KnowledgeError};

/// Reads the corpus straight from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsKnowledgeBaseLoader;

#[async_trait]
impl KnowledgeBaseLoader for FsKnowledgeBaseLoader {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn read_all(&self, path: &Path) -> Result<String, KnowledgeError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| KnowledgeError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}
