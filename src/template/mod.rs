//! HTML templates for generated documents.
//!
//! Substitution is literal: every `{{name}}` placeholder is replaced by the
//! matching value in a single pass, so values are never re-scanned and are
//! inserted without HTML escaping.

mod fields;

pub use fields::{ BasicDocument, CertificateFields };

use crate::error::{ AppError, Result };
use crate::providers::{ EmbeddedImage, RenderedDocument };

const CERTIFICATE_TEMPLATE: &str = include_str!("certificate.html");
const BASIC_TEMPLATE: &str = include_str!("basic.html");

/// Placeholder for the QR `<img>` element. Empty when no image is supplied.
const QR_IMAGE_PLACEHOLDER: &str = "qr_image";

pub fn render_certificate(
    fields: &CertificateFields,
    qr_image: Option<&EmbeddedImage>
) -> Result<RenderedDocument> {
    let qr_tag = qr_image
        .map(|image| format!(r#"<img src="{}" alt="QR Code" />"#, image.as_str()))
        .unwrap_or_default();

    let html = fill(CERTIFICATE_TEMPLATE, |name| {
        if name == QR_IMAGE_PLACEHOLDER { Some(qr_tag.as_str()) } else { fields.get(name) }
    })?;

    Ok(RenderedDocument::new(html))
}

pub fn render_basic(document: &BasicDocument) -> Result<RenderedDocument> {
    let html = fill(BASIC_TEMPLATE, |name| document.get(name))?;

    Ok(RenderedDocument::new(html))
}

fn fill<'a, F>(template: &str, lookup: F) -> Result<String> where F: Fn(&str) -> Option<&'a str> {
    let mut out = String::with_capacity(template.len() + 1024);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let end = after
            .find("}}")
            .ok_or_else(|| AppError::Internal("Unterminated template placeholder".to_string()))?;
        let name = after[..end].trim();

        let value = lookup(name).ok_or_else(|| AppError::MissingField(name.to_string()))?;
        out.push_str(value);

        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Placeholder names referenced by a template, in order of appearance.
#[cfg(test)]
fn placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let end = after.find("}}").unwrap();
        names.push(after[..end].trim().to_string());
        rest = &after[end + 2..];
    }

    names
}
