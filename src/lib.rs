pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod orders;
pub mod search;
pub mod seed;
pub mod settings;
pub mod store;
pub mod updates;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::handler::HandlerWithoutStateExt;
use axum::{
    Router,
    routing::{get, post, put},
};
use handlers::{
    create_order, health, image_not_found, list_lessons, search_lessons, update_lesson,
};
use http::HeaderValue;
use tokio::signal;
use tower_http::LatencyUnit;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, error, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::ApiDoc;
use crate::settings::{AllowedOrigins, Settings};
use crate::store::{MongoStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(settings: Settings, store: Arc<dyn Store>) -> Self {
        Self { settings, store }
    }
}

pub fn init_tracing(debug: bool) {
    let env_filter = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    init_tracing(settings.debug);

    let store = Arc::new(MongoStore::connect(&settings.mongodb_uri, &settings.db_name).await?);
    let state = AppState::new(settings.clone(), store.clone());
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            store.close().await;
            return Err(err.into());
        }
    };
    info!("Server listening on {addr}");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    store.close().await;
    served?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let images = ServeDir::new(&state.settings.images_dir)
        .not_found_service(image_not_found.into_service());

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/lessons", get(list_lessons))
        .route("/lessons/{id}", put(update_lesson))
        .route("/search", get(search_lessons))
        .route("/orders", post(create_order))
        .nest_service("/images", images)
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router
        .layer(cors_layer(&state.settings.allowed_origins()))
        .layer(trace_layer)
}

fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origins {
        AllowedOrigins::Any => layer.allow_origin(Any),
        AllowedOrigins::List(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %origin, "ignoring unparsable allowed origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(origins))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
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
    info!("Shutting down server...");
}
