use certificate_service::{ Config, Result };
use std::sync::Arc;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "certificate_service=debug,tower_http=debug".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!(
        "Starting certificate-service on host {} with {} storage ({} delivery)",
        config.host_id,
        config.storage_backend,
        config.delivery_mode
    );

    // Initialize pipeline capabilities
    let qr_encoder = Arc::new(certificate_service::qr::PngQrEncoder::new(config.qr_module_size));
    let rasterizer = Arc::new(
        certificate_service::render::ChromiumRasterizer::new(config.render.clone())
    );
    let store = certificate_service::storage::from_config(&config).await?;

    let document_service = Arc::new(
        certificate_service::services::DocumentService::new(
            qr_encoder,
            rasterizer,
            store,
            config.host_id.clone(),
            config.verify_base_url.clone()
        )
    );

    let app_state = certificate_service::api::AppState::new(document_service, config.delivery_mode);
    let app = certificate_service::api::router(app_state);

    // Start server
    let addr = config.bind_addr();
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener
        ::bind(&addr).await
        .map_err(|e| certificate_service::AppError::Internal(e.to_string()))?;

    axum::serve(listener, app).await.map_err(|e| certificate_service::AppError::Internal(e.to_string()))?;

    Ok(())
}
