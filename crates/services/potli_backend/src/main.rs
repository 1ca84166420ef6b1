// --- File: crates/services/potli_backend/src/main.rs ---
use potli_backend::{build_router, AppState};
use potli_common::{config_error, PotliError};
use potli_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _guard = potli_common::init();

    if let Err(e) = run().await {
        error!("🚨 Server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PotliError> {
    let config = Arc::new(load_config().map_err(config_error)?);
    let state = AppState::new(config.clone()).await?;
    let _subscribers = state.spawn_subscribers();

    #[allow(unused_mut)] // only the openapi feature adds routes
    let mut app = build_router(&state);

    #[cfg(feature = "openapi")]
    {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Potli API",
                version = "0.1.0",
                description = "Potli commerce backend"
            ),
            tags((name = "Potli", description = "Core service endpoints"))
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(potli_auth::doc::AuthApiDoc::openapi());
        openapi_doc.merge(potli_payment::doc::PaymentApiDoc::openapi());
        #[cfg(feature = "razorpay")]
        openapi_doc.merge(potli_razorpay::doc::RazorpayApiDoc::openapi());
        #[cfg(feature = "hero_banner")]
        openapi_doc.merge(potli_hero_banner::doc::HeroBannerApiDoc::openapi());
        #[cfg(feature = "settings_access")]
        openapi_doc.merge(potli_access::doc::AccessApiDoc::openapi());

        info!("📖 Adding Swagger UI at /api/docs");
        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("✅ Potli backend listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
