use axum::{extract::State, http::StatusCode, response::Html, routing::get, Json, Router};
use chrono::Local;
use clap::Args;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use wordmail_core::{render_dashboard, word_list, Config, StatisticsReport};

use super::{load_state, runtime, word_count};

#[derive(Args)]
pub struct ServeArgs {
    /// Bind address (defaults to server.host)
    #[arg(long)]
    host: Option<String>,
    /// Port (defaults to server.port)
    #[arg(long)]
    port: Option<u16>,
}

/// Every request reads the history file again.
struct Dashboard {
    config: Config,
}

impl Dashboard {
    fn report(&self) -> Result<StatisticsReport, String> {
        let state = load_state(&self.config).map_err(|e| e.to_string())?;
        let today = Local::now().date_naive();
        Ok(StatisticsReport::compute(&state, word_count(&self.config), today))
    }
}

pub fn run(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    runtime()?.block_on(async move {
        let app = router(Arc::new(Dashboard { config }));
        let listener = TcpListener::bind((host.as_str(), port)).await?;
        let addr = listener.local_addr()?;

        tracing::info!("statistics server listening on http://{addr}");
        println!("dashboard: http://{addr}/");
        println!("api:       http://{addr}/api/stats");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("statistics server shutting down");
            })
            .await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/stats", get(api_stats))
        .route("/api/words", get(api_words))
        .with_state(dashboard)
}

async fn index(
    State(dashboard): State<Arc<Dashboard>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let report = dashboard.report().map_err(server_error)?;
    Ok(Html(render_dashboard(&report)))
}

async fn api_stats(
    State(dashboard): State<Arc<Dashboard>>,
) -> Result<Json<StatisticsReport>, (StatusCode, String)> {
    dashboard.report().map(Json).map_err(server_error)
}

async fn api_words(
    State(dashboard): State<Arc<Dashboard>>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let state = load_state(&dashboard.config).map_err(|e| server_error(e.to_string()))?;
    let words = word_list(&state);
    Ok(Json(json!({
        "total": words.len(),
        "words": words,
    })))
}

fn server_error(message: String) -> (StatusCode, String) {
    tracing::error!(error = %message, "statistics request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, message)
}
