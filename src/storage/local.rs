use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{ AppError, Result };
use crate::providers::{ ArtifactLocation, ArtifactStore, PdfArtifact };

/// Writes artifacts into a directory on the local filesystem.
pub struct LocalArtifactStore {
    dir: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn store(&self, artifact: PdfArtifact) -> Result<ArtifactLocation> {
        tokio::fs
            ::create_dir_all(&self.dir).await
            .map_err(|e| AppError::Store(format!("Failed to create {}: {}", self.dir.display(), e)))?;

        let path = self.dir.join(&artifact.file_name);
        tokio::fs
            ::write(&path, &artifact.bytes).await
            .map_err(|e| AppError::Store(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::info!("Stored {} bytes at {}", artifact.bytes.len(), path.display());
        Ok(ArtifactLocation::LocalPath(path))
    }
}
