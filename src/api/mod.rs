use std::sync::Arc;

use axum::{ extract::Request, routing::get, Router };
use tower_http::{ cors::CorsLayer, trace::TraceLayer };
use uuid::Uuid;

pub mod generate;

use crate::enums::DeliveryMode;
use crate::services::DocumentService;

#[derive(Clone)]
pub struct AppState {
    pub document_service: Arc<DocumentService>,
    pub delivery_mode: DeliveryMode,
}

impl AppState {
    pub fn new(document_service: Arc<DocumentService>, delivery_mode: DeliveryMode) -> Self {
        Self {
            document_service,
            delivery_mode,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/generate-pdf", get(generate::generate_pdf))
        .route("/generate-certificate", get(generate::generate_certificate))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri()
                )
            })
        )
        .layer(CorsLayer::permissive())
}

async fn health_check() -> &'static str {
    "OK"
}
