//! HTML to PDF through a headless Chromium.
//!
//! Every call launches its own browser, so concurrent renders never share a
//! page or a CDP session.

use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::{ Browser, BrowserConfig, Page };
use futures::StreamExt;
use tempfile::TempDir;

use crate::config::RenderConfig;
use crate::error::{ AppError, Result };
use crate::providers::{ PdfRasterizer, RenderedDocument };

/// A4 in inches, as CDP expects.
pub const A4_WIDTH_IN: f64 = 8.27;
pub const A4_HEIGHT_IN: f64 = 11.69;

pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Resolves once the DOM, web fonts and every image are loaded.
const SETTLE_SCRIPT: &str =
    r#"(async () => {
    if (document.readyState !== "complete") {
        await new Promise((resolve) => window.addEventListener("load", resolve, { once: true }));
    }
    if (document.fonts) {
        await document.fonts.ready;
    }
    await Promise.all(Array.from(document.images).map((img) => img.complete
        ? Promise.resolve()
        : new Promise((resolve) => {
            img.addEventListener("load", resolve, { once: true });
            img.addEventListener("error", resolve, { once: true });
        })));
    return true;
})()"#;

pub struct ChromiumRasterizer {
    config: RenderConfig,
}

impl ChromiumRasterizer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    fn browser_config(&self, profile: &Path) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .request_timeout(self.config.request_timeout)
            .user_data_dir(profile);

        if let Some(path) = &self.config.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        if self.config.no_sandbox {
            builder = builder.no_sandbox();
        }

        builder.build().map_err(AppError::Render)
    }

    /// Fresh Chrome profile for one launch; removed when dropped.
    fn profile_dir() -> Result<TempDir> {
        tempfile::Builder
            ::new()
            .prefix("certificate-render-")
            .tempdir()
            .map_err(|e| AppError::Render(format!("Failed to create browser profile: {}", e)))
    }

    pub fn print_params() -> PrintToPdfParams {
        PrintToPdfParams {
            print_background: Some(true),
            paper_width: Some(A4_WIDTH_IN),
            paper_height: Some(A4_HEIGHT_IN),
            ..Default::default()
        }
    }

    async fn print(page: &Page, html: &str) -> Result<Vec<u8>> {
        page.set_content(html).await.map_err(|e| AppError::Render(e.to_string()))?;

        let settle = EvaluateParams::builder()
            .expression(SETTLE_SCRIPT)
            .await_promise(true)
            .build()
            .map_err(AppError::Render)?;
        page.evaluate_expression(settle).await.map_err(|e| AppError::Render(e.to_string()))?;

        page.pdf(Self::print_params()).await.map_err(|e| AppError::Render(e.to_string()))
    }
}

#[async_trait]
impl PdfRasterizer for ChromiumRasterizer {
    async fn rasterize(&self, document: &RenderedDocument) -> Result<Vec<u8>> {
        // Held until the browser has exited so Chrome never loses its profile mid-run
        let profile = Self::profile_dir()?;
        let (mut browser, mut handler) = Browser::launch(self.browser_config(profile.path())?).await.map_err(|e|
            AppError::Render(format!("Failed to launch browser: {}", e))
        )?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = match browser.new_page("about:blank").await {
            Ok(page) => Self::print(&page, document.html()).await,
            Err(e) => Err(AppError::Render(e.to_string())),
        };

        // The browser process is torn down whether or not printing succeeded
        if let Err(e) = browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = browser.wait().await {
            tracing::warn!("Browser did not exit cleanly: {}", e);
        }
        events.abort();
        drop(profile);

        let bytes = check_pdf(result?)?;

        tracing::debug!("Rasterized document into {} bytes", bytes.len());
        Ok(bytes)
    }
}

/// Reject anything the browser returned that is not a PDF byte stream.
pub fn check_pdf(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !bytes.starts_with(PDF_SIGNATURE) {
        return Err(AppError::Render("Browser returned a non-PDF payload".to_string()));
    }

    Ok(bytes)
}
