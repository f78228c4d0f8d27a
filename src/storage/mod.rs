pub mod local;
pub mod s3;

pub use local::LocalArtifactStore;
pub use s3::S3ArtifactStore;

use std::sync::Arc;

use crate::config::Config;
use crate::enums::StorageBackend;
use crate::error::{ AppError, Result };
use crate::providers::ArtifactStore;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Name every artifact generated on `host_id` is stored under.
///
/// Requests served by the same host share this name, so each one replaces
/// the previous artifact.
pub fn artifact_file_name(host_id: &str) -> String {
    let stem: String = host_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect();

    format!("{}_generated.pdf", stem)
}

/// Build the store selected by `STORAGE_BACKEND`.
pub async fn from_config(config: &Config) -> Result<Arc<dyn ArtifactStore>> {
    match config.storage_backend {
        StorageBackend::Local => {
            tracing::info!("Storing artifacts in {}", config.output_dir.display());
            Ok(Arc::new(LocalArtifactStore::new(config.output_dir.clone())))
        }
        StorageBackend::S3 => {
            let s3 = config.s3
                .as_ref()
                .ok_or_else(|| AppError::Config("S3 storage selected without S3 settings".to_string()))?;
            tracing::info!("Storing artifacts in s3://{}/{}", s3.bucket, s3.key_prefix);
            Ok(Arc::new(S3ArtifactStore::from_config(s3).await))
        }
    }
}
