// QR code generation for certificate verification links

use std::io::Cursor;

use base64::{ engine::general_purpose::STANDARD, Engine as _ };
use image::{ DynamicImage, ImageFormat, Luma };
use qrcode::{ EcLevel, QrCode };

use crate::error::{ AppError, Result };
use crate::providers::{ EmbeddedImage, QrEncoder };

/// Encodes URLs as PNG QR codes wrapped in a `data:` URI.
pub struct PngQrEncoder {
    module_size: u32,
}

impl PngQrEncoder {
    pub fn new(module_size: u32) -> Self {
        Self { module_size: module_size.max(1) }
    }

    pub fn png_bytes(&self, data: &str) -> Result<Vec<u8>> {
        if data.trim().is_empty() {
            return Err(AppError::Encoding("Cannot encode an empty URL".to_string()));
        }

        let code = QrCode::with_error_correction_level(data, EcLevel::M).map_err(|e|
            AppError::Encoding(e.to_string())
        )?;
        let image = code
            .render::<Luma<u8>>()
            .module_dimensions(self.module_size, self.module_size)
            .build();

        let mut buffer = Vec::new();
        DynamicImage::ImageLuma8(image)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|e| AppError::Encoding(e.to_string()))?;

        Ok(buffer)
    }
}

impl Default for PngQrEncoder {
    fn default() -> Self {
        Self::new(4)
    }
}

impl QrEncoder for PngQrEncoder {
    fn encode(&self, url: &str) -> Result<EmbeddedImage> {
        let png = self.png_bytes(url)?;
        tracing::debug!("Encoded QR code for {} ({} bytes)", url, png.len());

        Ok(EmbeddedImage::from_data_uri(format!("data:image/png;base64,{}", STANDARD.encode(png))))
    }
}
