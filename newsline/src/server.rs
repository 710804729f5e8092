use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::{get, routes, Build, Rocket, State};
use serde::Serialize;

use common::Config;

use crate::loader::load_page;
use crate::render::{render, OutputFormat};
use crate::timeline::{PageState, TimelineOptions};

/// Application state stored inside Rocket managed state.
///
/// Only immutable values live here; every request loads its own snapshot of the feed.
#[derive(Clone)]
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub config: Arc<Config>,
    pub data_path: PathBuf,
}

impl AppState {
    async fn page(&self) -> PageState {
        let options = TimelineOptions::from(&self.config.timeline);
        let page = load_page(&self.data_path, &options).await;
        if !page.is_ready() {
            tracing::warn!(data = %self.data_path.display(), "serving a page without a timeline");
        }
        page
    }
}

/// Response structure for `/api/v1/status`.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    uptime_seconds: i64,
    data_path: String,
    window_minutes: i64,
}

/// The timeline as an HTML page.
#[get("/")]
async fn index(state: &State<AppState>) -> Result<RawHtml<String>, Status> {
    let page = state.page().await;
    render(&page, OutputFormat::Html, &state.config)
        .map(RawHtml)
        .map_err(|e| {
            tracing::error!("failed to render html page: {:#}", e);
            Status::InternalServerError
        })
}

/// The timeline as wrapped plain text.
#[get("/timeline.txt")]
async fn timeline_text(state: &State<AppState>) -> Result<String, Status> {
    let page = state.page().await;
    render(&page, OutputFormat::Text, &state.config).map_err(|e| {
        tracing::error!("failed to render text page: {:#}", e);
        Status::InternalServerError
    })
}

/// The page model as JSON, for other renderers.
#[get("/api/v1/timeline")]
async fn timeline_json(state: &State<AppState>) -> Json<PageState> {
    Json(state.page().await)
}

#[get("/health")]
async fn health() -> &'static str {
    "OK"
}

/// Status endpoint returning simple JSON with uptime and the served document.
#[get("/api/v1/status")]
async fn status(state: &State<AppState>) -> Json<StatusResponse> {
    let uptime = (Utc::now() - state.started_at).num_seconds();
    Json(StatusResponse {
        status: "ok",
        uptime_seconds: uptime,
        data_path: state.data_path.display().to_string(),
        window_minutes: state.config.timeline.window_minutes,
    })
}

/// Build the Rocket instance with managed state and routes, bound to `[server]` from the config.
pub fn build_rocket(config: Arc<Config>, data_path: PathBuf) -> Rocket<Build> {
    let fig = rocket::Config::figment()
        .merge(("address", config.server.bind.clone()))
        .merge(("port", config.server.port));

    let state = AppState {
        started_at: Utc::now(),
        config,
        data_path,
    };

    rocket::custom(fig).manage(state).mount(
        "/",
        routes![index, timeline_text, timeline_json, health, status],
    )
}

/// Launch the HTTP server and block until it shuts down (SIGINT/SIGTERM etc.).
pub async fn launch_rocket(config: Arc<Config>, data_path: PathBuf) -> Result<()> {
    tracing::info!(
        bind = %config.server.bind,
        port = config.server.port,
        data = %data_path.display(),
        "Starting Rocket HTTP server"
    );
    build_rocket(config, data_path)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}
