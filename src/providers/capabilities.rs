use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

/// Self-contained image reference, e.g. `data:image/png;base64,...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage(String);

impl EmbeddedImage {
    pub fn from_data_uri(uri: String) -> Self {
        Self(uri)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A complete HTML document ready for rasterization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument(String);

impl RenderedDocument {
    pub fn new(html: String) -> Self {
        Self(html)
    }

    pub fn html(&self) -> &str {
        &self.0
    }
}

/// PDF bytes plus the name they should be stored under.
#[derive(Debug, Clone)]
pub struct PdfArtifact {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactLocation {
    LocalPath(PathBuf),
    RemoteUrl(String),
}

impl fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactLocation::LocalPath(path) => write!(f, "{}", path.display()),
            ArtifactLocation::RemoteUrl(url) => f.write_str(url),
        }
    }
}

pub trait QrEncoder: Send + Sync {
    /// Encode a URL into an image that can be inlined in HTML
    fn encode(&self, url: &str) -> Result<EmbeddedImage>;
}

#[async_trait]
pub trait PdfRasterizer: Send + Sync {
    /// Print a fully inlined HTML document to PDF bytes
    async fn rasterize(&self, document: &RenderedDocument) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist the artifact and return where it can be fetched
    async fn store(&self, artifact: PdfArtifact) -> Result<ArtifactLocation>;
}
