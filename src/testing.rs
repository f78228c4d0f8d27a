//! Deterministic doubles for the pipeline capabilities, with call counters.

use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::{ Arc, Mutex };

use async_trait::async_trait;

use crate::error::{ AppError, Result };
use crate::providers::{
    ArtifactLocation,
    ArtifactStore,
    EmbeddedImage,
    PdfArtifact,
    PdfRasterizer,
    QrEncoder,
    RenderedDocument,
};
use crate::services::DocumentService;

pub const FAKE_PDF: &[u8] = b"%PDF-1.7\n1 0 obj << /Type /Page >> endobj\n%%EOF";

#[derive(Default)]
pub struct FakeQrEncoder {
    pub calls: AtomicUsize,
    pub urls: Mutex<Vec<String>>,
    pub fail: bool,
}

impl QrEncoder for FakeQrEncoder {
    fn encode(&self, url: &str) -> Result<EmbeddedImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());

        if self.fail {
            return Err(AppError::Encoding("injected encoder failure".to_string()));
        }
        Ok(EmbeddedImage::from_data_uri(format!("data:image/png;base64,FAKE:{}", url)))
    }
}

#[derive(Default)]
pub struct FakeRasterizer {
    pub calls: AtomicUsize,
    pub documents: Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl PdfRasterizer for FakeRasterizer {
    async fn rasterize(&self, document: &RenderedDocument) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.documents.lock().unwrap().push(document.html().to_string());

        if self.fail {
            return Err(AppError::Render("injected renderer crash".to_string()));
        }

        let mut bytes = FAKE_PDF.to_vec();
        bytes.extend_from_slice(document.html().as_bytes());
        Ok(bytes)
    }
}

/// Keeps only the latest bytes per file name, like a real bucket or directory.
#[derive(Default)]
pub struct FakeStore {
    pub calls: AtomicUsize,
    pub objects: Mutex<Vec<(String, Vec<u8>)>>,
    pub fail: bool,
}

impl FakeStore {
    pub fn object(&self, file_name: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|(name, _)| name == file_name)
            .map(|(_, bytes)| bytes.clone())
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ArtifactStore for FakeStore {
    async fn store(&self, artifact: PdfArtifact) -> Result<ArtifactLocation> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(AppError::Store("injected upload failure".to_string()));
        }

        let mut objects = self.objects.lock().unwrap();
        objects.retain(|(name, _)| name != &artifact.file_name);
        let url = format!("https://store.test/{}", artifact.file_name);
        objects.push((artifact.file_name, artifact.bytes));

        Ok(ArtifactLocation::RemoteUrl(url))
    }
}

pub struct Fakes {
    pub qr: Arc<FakeQrEncoder>,
    pub rasterizer: Arc<FakeRasterizer>,
    pub store: Arc<FakeStore>,
}

impl Fakes {
    pub fn new() -> Self {
        Self {
            qr: Arc::new(FakeQrEncoder::default()),
            rasterizer: Arc::new(FakeRasterizer::default()),
            store: Arc::new(FakeStore::default()),
        }
    }

    pub fn service(&self, host_id: &str, verify_base_url: Option<&str>) -> DocumentService {
        DocumentService::new(
            self.qr.clone(),
            self.rasterizer.clone(),
            self.store.clone(),
            host_id.to_string(),
            verify_base_url.map(str::to_string)
        )
    }

    pub fn qr_calls(&self) -> usize {
        self.qr.calls.load(Ordering::SeqCst)
    }

    pub fn render_calls(&self) -> usize {
        self.rasterizer.calls.load(Ordering::SeqCst)
    }

    pub fn store_calls(&self) -> usize {
        self.store.calls.load(Ordering::SeqCst)
    }
}
