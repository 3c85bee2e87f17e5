//! HTTP serving of the rendered dashboard.
//!
//! The page and the JSON snapshot are rendered once before the listener
//! starts; handlers only hand out cheap clones of the same bytes.

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{DashboardSnapshot, Dataset};
use crate::error::{AppError, ErrorKind};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8050;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Clone)]
pub struct DashboardState {
    page: Bytes,
    json: Bytes,
}

impl DashboardState {
    pub fn new(page: String, snapshot: &DashboardSnapshot) -> Result<Self, AppError> {
        let json = serde_json::to_vec(&SnapshotView::from(snapshot))
            .map_err(|e| AppError::format(format!("Failed to serialize datasets: {e}")))?;
        Ok(Self {
            page: Bytes::from(page),
            json: Bytes::from(json),
        })
    }
}

#[derive(Debug, Serialize)]
struct SnapshotView<'a> {
    fetched_at: DateTime<Utc>,
    datasets: Vec<DatasetView<'a>>,
}

#[derive(Debug, Serialize)]
struct DatasetView<'a> {
    key: &'a str,
    title: &'a str,
    y_title: &'a str,
    labels: Vec<&'a str>,
    rows: Vec<RowView>,
}

#[derive(Debug, Serialize)]
struct RowView {
    period: String,
    values: Vec<f64>,
}

impl<'a> From<&'a DashboardSnapshot> for SnapshotView<'a> {
    fn from(snapshot: &'a DashboardSnapshot) -> Self {
        Self {
            fetched_at: snapshot.fetched_at,
            datasets: snapshot.datasets.iter().map(DatasetView::from).collect(),
        }
    }
}

impl<'a> From<&'a Dataset> for DatasetView<'a> {
    fn from(dataset: &'a Dataset) -> Self {
        let table = &dataset.table;
        Self {
            key: dataset.spec.key,
            title: dataset.spec.title,
            y_title: dataset.spec.y_title,
            labels: table.labels().collect(),
            rows: table
                .periods
                .iter()
                .enumerate()
                .map(|(idx, period)| RowView {
                    period: period.format("%Y-%m").to_string(),
                    values: table.row(idx),
                })
                .collect(),
        }
    }
}

pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/datasets", get(datasets))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn index(State(state): State<DashboardState>) -> Html<Bytes> {
    Html(state.page.clone())
}

async fn datasets(State(state): State<DashboardState>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], state.json.clone())
}

async fn healthz() -> &'static str {
    "ok"
}

/// Serve until Ctrl-C. Blocks the calling thread on a fresh tokio runtime.
pub fn run(config: &ServeConfig, state: DashboardState) -> Result<(), AppError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::io(format!("Failed to start async runtime: {e}")))?;
    runtime.block_on(serve(config, state))
}

async fn serve(config: &ServeConfig, state: DashboardState) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|e| {
            AppError::new(
                ErrorKind::Io,
                format!("Failed to bind {}:{}: {e}", config.host, config.port),
            )
        })?;

    info!("dashboard listening on http://{}:{}", config.host, config.port);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::io(format!("Server error: {e}")))?;
    info!("dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler, run until the process is killed.
        warn!("failed to install Ctrl-C handler: {e}");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use chrono::{NaiveDate, TimeZone};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::{Column, MergedTable, catalog};

    fn snapshot() -> DashboardSnapshot {
        DashboardSnapshot {
            datasets: vec![Dataset {
                spec: catalog::TRADE_BALANCE,
                table: MergedTable {
                    periods: vec![NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()],
                    columns: vec![
                        Column { label: "A".to_string(), values: vec![0.077] },
                        Column { label: "B".to_string(), values: vec![0.62444] },
                    ],
                },
            }],
            fetched_at: Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
        }
    }

    fn app() -> Router {
        let state = DashboardState::new("<html>dash</html>".to_string(), &snapshot()).unwrap();
        router(state)
    }

    async fn get_body(uri: &str) -> (StatusCode, Option<String>, Bytes) {
        let resp = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, content_type, body)
    }

    #[tokio::test]
    async fn index_serves_rendered_page() {
        let (status, content_type, body) = get_body("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert_eq!(&body[..], b"<html>dash</html>");
    }

    #[tokio::test]
    async fn datasets_endpoint_returns_snapshot_json() {
        let (status, content_type, body) = get_body("/api/datasets").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let ds = &json["datasets"][0];
        assert_eq!(ds["key"], "trade");
        assert_eq!(ds["labels"], serde_json::json!(["A", "B"]));
        assert_eq!(ds["rows"][0]["period"], "2024-02");
        assert_eq!(ds["rows"][0]["values"][1], 0.62444);
    }

    #[tokio::test]
    async fn health_and_unknown_routes() {
        let (status, _, body) = get_body("/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"ok");

        let (status, _, _) = get_body("/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
