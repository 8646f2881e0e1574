//! HTTP server implementation for the collection API

use axum::{
    http::{
        header::{CONTENT_TYPE, AUTHORIZATION},
        Method,
    },
    routing::get,
    Router,
};
use std::future::Future;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

use super::handlers;
use crate::core::{AppState, Result};

/// Creates the main application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration - permissive, there is no auth to protect
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_origin(Any);

    // Collection routes, mounted under the API prefix
    let api = Router::new()
        .route("/", get(handlers::service_info))
        .route(
            "/{collection}",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route(
            "/{collection}/{id}",
            get(handlers::get_item)
                .patch(handlers::update_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        );

    let mut app = Router::new()
        .route("/health", get(handlers::health_check))
        .nest(&state.config.server.api_prefix, api);

    // Everything else is static content, with index.html standing in for client-side routes
    if let Some(static_files) = &state.config.static_files {
        let dir = ServeDir::new(&static_files.dir);
        app = if static_files.spa_fallback {
            app.fallback_service(dir.fallback(ServeFile::new(static_files.dir.join("index.html"))))
        } else {
            app.fallback_service(dir)
        };
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
    .with_state(state)
}

/// Start the HTTP server and run until `shutdown` resolves
pub async fn start_server<F>(state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = state.config.server.http_addr;
    let prefix = state.config.server.api_prefix.clone();
    let static_dir = state.config.static_files.as_ref().map(|s| s.dir.clone());

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Collections available at http://{}{}/{{collection}}", addr, prefix);
    info!("Health check available at http://{}/health", addr);
    if let Some(dir) = static_dir {
        info!("Serving static files from {:?}", dir);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
