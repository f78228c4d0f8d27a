use std::sync::Arc;

use crate::error::Result;
use crate::providers::{
    ArtifactLocation,
    ArtifactStore,
    PdfArtifact,
    PdfRasterizer,
    QrEncoder,
    RenderedDocument,
};
use crate::storage::artifact_file_name;
use crate::template::{ self, BasicDocument, CertificateFields };

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub location: ArtifactLocation,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Runs QR encode → template → rasterize → store for a single request.
pub struct DocumentService {
    qr_encoder: Arc<dyn QrEncoder>,
    rasterizer: Arc<dyn PdfRasterizer>,
    store: Arc<dyn ArtifactStore>,
    host_id: String,
    verify_base_url: Option<String>,
}

impl DocumentService {
    pub fn new(
        qr_encoder: Arc<dyn QrEncoder>,
        rasterizer: Arc<dyn PdfRasterizer>,
        store: Arc<dyn ArtifactStore>,
        host_id: String,
        verify_base_url: Option<String>
    ) -> Self {
        Self {
            qr_encoder,
            rasterizer,
            store,
            host_id,
            verify_base_url,
        }
    }

    pub async fn generate_basic(&self, document: BasicDocument) -> Result<GeneratedDocument> {
        tracing::debug!("Rendering basic document '{}'", document.title);
        let rendered = template::render_basic(&document)?;

        self.rasterize_and_store(rendered).await
    }

    pub async fn generate_certificate(
        &self,
        fields: CertificateFields,
        verify_url: Option<String>
    ) -> Result<GeneratedDocument> {
        // The image must be inlined before the HTML reaches the browser
        let qr_image = match self.verification_url(&fields, verify_url) {
            Some(url) => Some(self.qr_encoder.encode(&url)?),
            None => None,
        };

        tracing::debug!("Rendering certificate {}", fields.authentication_number);
        let rendered = template::render_certificate(&fields, qr_image.as_ref())?;

        self.rasterize_and_store(rendered).await
    }

    /// Explicit URL wins; otherwise derive one from `VERIFY_BASE_URL`.
    pub fn verification_url(&self, fields: &CertificateFields, explicit: Option<String>) -> Option<String> {
        explicit.filter(|url| !url.trim().is_empty()).or_else(|| {
            self.verify_base_url
                .as_ref()
                .map(|base| {
                    format!("{}/{}", base, urlencoding::encode(&fields.authentication_number))
                })
        })
    }

    async fn rasterize_and_store(&self, rendered: RenderedDocument) -> Result<GeneratedDocument> {
        let bytes = self.rasterizer.rasterize(&rendered).await?;

        let file_name = artifact_file_name(&self.host_id);
        let location = self.store.store(PdfArtifact {
            bytes: bytes.clone(),
            file_name: file_name.clone(),
        }).await?;

        Ok(GeneratedDocument {
            location,
            file_name,
            bytes,
        })
    }
}
