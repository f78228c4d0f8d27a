use std::collections::HashMap;

use axum::{
    extract::{ Query, State },
    http::{ header, HeaderValue, StatusCode },
    response::{ IntoResponse, Redirect, Response },
};
use serde::Deserialize;

use crate::enums::DeliveryMode;
use crate::error::{ AppError, Result };
use crate::services::GeneratedDocument;
use crate::storage::PDF_CONTENT_TYPE;
use crate::template::{ BasicDocument, CertificateFields };

use super::AppState;

pub const MISSING_TITLE_OR_CONTENT: &str = "Missing \"title\" or \"content\" query parameter.";

#[derive(Deserialize)]
pub struct GeneratePdfQuery {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

pub async fn generate_pdf(
    State(state): State<AppState>,
    Query(query): Query<GeneratePdfQuery>
) -> Result<Response> {
    let (title, content) = match (non_empty(query.title), non_empty(query.content)) {
        (Some(title), Some(content)) => (title, content),
        _ => {
            return Err(AppError::Validation(MISSING_TITLE_OR_CONTENT.to_string()));
        }
    };

    let generated = state.document_service.generate_basic(BasicDocument { title, content }).await?;

    deliver(state.delivery_mode, generated)
}

/// Certificate fields come straight from the query string; `verify_url`
/// overrides the QR target.
pub async fn generate_certificate(
    State(state): State<AppState>,
    Query(mut params): Query<HashMap<String, String>>
) -> Result<Response> {
    let verify_url = params.remove("verify_url");
    params.retain(|_, value| !value.trim().is_empty());

    let fields = CertificateFields::from_map(&params)?;
    let generated = state.document_service.generate_certificate(fields, verify_url).await?;

    deliver(state.delivery_mode, generated)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn deliver(mode: DeliveryMode, generated: GeneratedDocument) -> Result<Response> {
    let location = generated.location.to_string();

    match mode {
        DeliveryMode::Redirect => Ok(Redirect::to(&location).into_response()),
        DeliveryMode::Inline => {
            let disposition = format!("inline; filename=\"{}\"", generated.file_name);
            let headers = [
                (header::CONTENT_TYPE, HeaderValue::from_static(PDF_CONTENT_TYPE)),
                (header::CONTENT_DISPOSITION, header_value(&disposition)?),
                (header::CONTENT_LOCATION, header_value(&location)?),
            ];

            Ok((StatusCode::OK, headers, generated.bytes).into_response())
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e|
        AppError::Internal(format!("Invalid header value '{}': {}", value, e))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{ to_bytes, Body };
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::api::{ router, AppState };
    use crate::error::GENERATION_FAILED_MESSAGE;
    use crate::storage::LocalArtifactStore;
    use crate::testing::{ FakeQrEncoder, FakeRasterizer, Fakes, FAKE_PDF };

    async fn get(state: AppState, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
        (status, headers, body)
    }

    fn state(fakes: &Fakes, mode: DeliveryMode) -> AppState {
        AppState::new(Arc::new(fakes.service("node-a", Some("https://verify.example.gov"))), mode)
    }

    fn certificate_query() -> String {
        CertificateFields::NAMES.iter()
            .map(|name| format!("{}=v-{}", name, name))
            .collect::<Vec<_>>()
            .join("&")
    }

    #[tokio::test]
    async fn test_health() {
        let fakes = Fakes::new();
        let (status, _, body) = get(state(&fakes, DeliveryMode::Inline), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_missing_params_is_400_without_downstream_calls() {
        for uri in [
            "/generate-pdf",
            "/generate-pdf?title=Test",
            "/generate-pdf?content=Hello",
            "/generate-pdf?title=&content=Hello",
        ] {
            let fakes = Fakes::new();
            let (status, _, body) = get(state(&fakes, DeliveryMode::Inline), uri).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(String::from_utf8(body).unwrap(), MISSING_TITLE_OR_CONTENT);
            assert_eq!(fakes.qr_calls(), 0);
            assert_eq!(fakes.render_calls(), 0);
            assert_eq!(fakes.store_calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_end_to_end_inline() {
        let fakes = Fakes::new();
        let (status, headers, body) = get(
            state(&fakes, DeliveryMode::Inline),
            "/generate-pdf?title=Test&content=Hello"
        ).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with(FAKE_PDF));
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(headers[header::CONTENT_LOCATION], "https://store.test/node-a_generated.pdf");
        assert_eq!(headers[header::CONTENT_DISPOSITION], "inline; filename=\"node-a_generated.pdf\"");

        assert_eq!(fakes.store_calls(), 1);
        let stored = fakes.store.object("node-a_generated.pdf").unwrap();
        assert!(!stored.is_empty());
        assert_eq!(stored, body);

        let html = fakes.rasterizer.documents.lock().unwrap()[0].clone();
        assert!(html.contains("<h1>Test</h1>"));
        assert!(html.contains("<p>Hello</p>"));
    }

    #[tokio::test]
    async fn test_end_to_end_redirect() {
        let fakes = Fakes::new();
        let (status, headers, _) = get(
            state(&fakes, DeliveryMode::Redirect),
            "/generate-pdf?title=Test&content=Hello"
        ).await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "https://store.test/node-a_generated.pdf");
        assert_eq!(fakes.store_calls(), 1);
    }

    #[tokio::test]
    async fn test_render_failure_is_500_and_skips_store() {
        let mut fakes = Fakes::new();
        fakes.rasterizer = Arc::new(FakeRasterizer { fail: true, ..Default::default() });

        let (status, _, body) = get(
            state(&fakes, DeliveryMode::Inline),
            "/generate-pdf?title=Test&content=Hello"
        ).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(String::from_utf8(body).unwrap(), GENERATION_FAILED_MESSAGE);
        assert_eq!(fakes.render_calls(), 1);
        assert_eq!(fakes.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_encoder_failure_is_500() {
        let mut fakes = Fakes::new();
        fakes.qr = Arc::new(FakeQrEncoder { fail: true, ..Default::default() });

        let uri = format!("/generate-certificate?{}", certificate_query());
        let (status, _, body) = get(state(&fakes, DeliveryMode::Inline), &uri).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(String::from_utf8(body).unwrap(), GENERATION_FAILED_MESSAGE);
        assert_eq!(fakes.render_calls(), 0);
        assert_eq!(fakes.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_certificate_missing_field_is_400() {
        let fakes = Fakes::new();
        let query = certificate_query().replace("lot_size=v-lot_size", "lot_size=");
        let uri = format!("/generate-certificate?{}", query);

        let (status, _, body) = get(state(&fakes, DeliveryMode::Inline), &uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(body).unwrap(), "Missing \"lot_size\" query parameter.");
        assert_eq!(fakes.qr_calls(), 0);
        assert_eq!(fakes.render_calls(), 0);
        assert_eq!(fakes.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_certificate_end_to_end() {
        let fakes = Fakes::new();
        let uri = format!("/generate-certificate?{}", certificate_query());

        let (status, _, _) = get(state(&fakes, DeliveryMode::Inline), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(fakes.qr_calls(), 1);
        assert_eq!(
            fakes.qr.urls.lock().unwrap()[0],
            "https://verify.example.gov/v-authentication_number"
        );

        // The fake QR payload repeats the authentication number, so drop the image first
        let html = fakes.rasterizer.documents.lock().unwrap()[0].replace(
            r#"<img src="data:image/png;base64,FAKE:https://verify.example.gov/v-authentication_number" alt="QR Code" />"#,
            ""
        );
        for name in CertificateFields::NAMES {
            assert_eq!(html.matches(&format!("v-{}", name)).count(), 1, "{}", name);
        }
    }

    #[tokio::test]
    async fn test_sequential_requests_overwrite_local_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let fakes = Fakes::new();
        let service = crate::services::DocumentService::new(
            fakes.qr.clone(),
            fakes.rasterizer.clone(),
            Arc::new(LocalArtifactStore::new(dir.path().to_path_buf())),
            "node-a".to_string(),
            None
        );
        let state = AppState::new(Arc::new(service), DeliveryMode::Inline);

        let (_, first_headers, _) = get(state.clone(), "/generate-pdf?title=First&content=One").await;
        let (_, second_headers, second_body) = get(state, "/generate-pdf?title=Second&content=Two").await;

        assert_eq!(first_headers[header::CONTENT_LOCATION], second_headers[header::CONTENT_LOCATION]);

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);

        let on_disk = std::fs::read(dir.path().join("node-a_generated.pdf")).unwrap();
        assert_eq!(on_disk, second_body);
        assert!(String::from_utf8_lossy(&on_disk).contains("<h1>Second</h1>"));
    }
}
