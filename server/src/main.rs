// Thin HTTP host for the task manager frontend: static assets with
// compression, a health endpoint, and a passthrough that streams
// branding stylesheets from the environment's asset host.

mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use clap::Parser;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Environment;

#[derive(Parser)]
#[command(name = "taskdeck-server")]
#[command(about = "Static host and stylesheet passthrough for the task manager UI")]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
    /// Directory holding the built frontend assets
    #[arg(long, env = "BUILD_DIR", default_value = "build")]
    build_dir: PathBuf,
}

struct AppState {
    environment: Environment,
    http: reqwest::Client,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let args = Args::parse();
    let environment = Environment::from_deployment_env();
    info!("using env {}", environment.name());

    let state = Arc::new(AppState {
        environment,
        http: reqwest::Client::new(),
    });

    let router = build_router(state, &args.build_dir);

    let addr: SocketAddr = ([0, 0, 0, 0], args.port).into();
    info!("server started on port {}", args.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, build_dir: &std::path::Path) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/{version}/brandingstyles.css", get(branding_css))
        .with_state(state)
        .fallback_service(ServeDir::new(build_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}

#[derive(Deserialize)]
struct CssParams {
    tenant: Option<String>,
}

/// Streams the branding stylesheet for `version` from the asset host
/// straight through to the caller. Any upstream failure is a 404; the
/// frontend falls back to its bundled styles.
async fn branding_css(
    State(state): State<Arc<AppState>>,
    Path(version): Path<String>,
    Query(params): Query<CssParams>,
) -> Response {
    let url = config::css_url(state.environment, &version, params.tenant.as_deref());
    info!("get CSS: {url}");

    match state.http.get(&url).send().await {
        Ok(upstream) if upstream.status().is_success() => (
            [(header::CONTENT_TYPE, "text/css")],
            Body::from_stream(upstream.bytes_stream()),
        )
            .into_response(),
        Ok(upstream) => {
            warn!("upstream returned {} for {url}", upstream.status());
            StatusCode::NOT_FOUND.into_response()
        }
        Err(e) => {
            warn!("failed to fetch {url}: {e}");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}
