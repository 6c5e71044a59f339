//! HTTP front end.
//!
//! - `GET /map?name=<pkg>`: function JSON for the package directory
//! - `GET /map_struct?name=<pkg>`: struct JSON for the package directory
//! - anything else: static files from the web UI directory
//!
//! Each request runs its own extraction pass on the blocking pool; nothing
//! is shared between requests except the configuration.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::config::Config;
use crate::error::ExtractError;
use crate::extract::{self, ExtractOptions};

/// Query string of both extraction routes.
#[derive(Debug, Deserialize)]
pub struct PackageQuery {
    #[serde(default)]
    pub name: String,
}

/// Create the router for the given configuration.
pub fn router(config: Arc<Config>) -> Router {
    let web_dir = config.web_dir.clone();
    Router::new()
        .route("/map", get(map_handler))
        .route("/map_struct", get(map_struct_handler))
        .fallback_service(ServeDir::new(web_dir))
        .with_state(config)
}

/// Bind to the configured address and serve until the process exits.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .listen
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen address {:?}: {}", config.listen, e))?;
    let listener = TcpListener::bind(addr).await?;

    info!(
        "Listening on http://{} (web UI from {})",
        addr,
        config.web_dir.display()
    );

    axum::serve(listener, router(Arc::new(config))).await?;
    Ok(())
}

async fn map_handler(
    State(config): State<Arc<Config>>,
    Query(query): Query<PackageQuery>,
) -> Response {
    run_extraction(config, query.name, extract::function_json).await
}

async fn map_struct_handler(
    State(config): State<Arc<Config>>,
    Query(query): Query<PackageQuery>,
) -> Response {
    run_extraction(config, query.name, extract::struct_json).await
}

type ExtractFn = fn(&Path, &ExtractOptions) -> Result<String, ExtractError>;

async fn run_extraction(config: Arc<Config>, name: String, extract_fn: ExtractFn) -> Response {
    let dir = match config.resolve_package(&name) {
        Ok(dir) => dir,
        Err(e) => return error_response(&e),
    };
    let options = config.extract_options();

    info!(package = %name, dir = %dir.display(), "extracting");
    let result = tokio::task::spawn_blocking(move || extract_fn(&dir, &options)).await;

    match result {
        Ok(Ok(body)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Ok(Err(e)) => error_response(&e),
        Err(e) => {
            error!("extraction task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({ "error": e.to_string(), "code": 500 })),
            )
                .into_response()
        }
    }
}

fn error_response(e: &ExtractError) -> Response {
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    error!("{}", e);
    (
        status,
        axum::Json(json!({ "error": e.to_string(), "code": status.as_u16() })),
    )
        .into_response()
}
