//! # Tickplot Web
//!
//! The form at `/`: GET renders it, POST runs [`ChartService`] and re-renders
//! the page with the chart or the error message. The chart itself is served
//! from `/static`.

mod handlers;
mod page;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tickplot_core::ChartService;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use page::{render_page, ChartView, PageView};

/// Shared state behind every route.
#[derive(Debug)]
pub struct AppState {
    service: ChartService,
    static_dir: PathBuf,
    chart_revision: AtomicU64,
}

impl AppState {
    pub fn new(service: ChartService, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            service,
            static_dir: static_dir.into(),
            chart_revision: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &ChartService {
        &self.service
    }

    /// URL of a freshly written chart. The revision query defeats browser caching
    /// of the fixed file name.
    fn chart_url(&self, chart_path: &Path) -> String {
        let revision = self.chart_revision.fetch_add(1, Ordering::Relaxed) + 1;
        let relative = chart_path
            .strip_prefix(&self.static_dir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(chart_path.file_name().unwrap_or_default()));
        let relative = relative
            .components()
            .map(|part| part.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        format!("/static/{relative}?v={revision}")
    }
}

pub fn app_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new(state.static_dir.clone());
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit))
        .route("/health", get(handlers::health))
        .nest_service("/static", static_service)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `router` until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on {}", addr);
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
