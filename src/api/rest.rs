use crate::config::{ApiConfig, Config};
use crate::db::repositories::SearchFilters;
use crate::error::Error;
use crate::report::ReportService;
use crate::services::{AggregationService, IngestionService, MediaPayload, QueryService};
use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use log::info;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

// Shared application state: the services are constructed once at startup
// and handed to every handler by reference.
#[derive(Clone)]
pub struct AppState {
    pub ingestion: Arc<IngestionService>,
    pub query: Arc<QueryService>,
    pub aggregation: Arc<AggregationService>,
    pub report: Arc<ReportService>,
}

impl AppState {
    pub fn new(pool: Arc<PgPool>, config: &Config) -> Self {
        Self {
            ingestion: Arc::new(IngestionService::new(pool.clone(), config.upload.clone())),
            query: Arc::new(QueryService::new(pool.clone(), config.security.clone())),
            aggregation: Arc::new(AggregationService::new(pool.clone())),
            report: Arc::new(ReportService::new(pool, config.report.clone())),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::BAD_REQUEST.as_u16(),
            },
            Error::Unauthorized(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::UNAUTHORIZED.as_u16(),
            },
            Error::NotFound(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::NOT_FOUND.as_u16(),
            },
            _ => ApiError {
                message: err.to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            },
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(err) = err.downcast_ref::<Error>() {
            return (*err).clone().into();
        }

        ApiError {
            message: err.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(json!({ "status": "error", "message": self.message }));
        (status, body).into_response()
    }
}

pub struct RestApi {
    config: ApiConfig,
    state: AppState,
    body_limit: usize,
}

impl RestApi {
    pub fn new(config: &ApiConfig, state: AppState, max_payload_mb: usize) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            state,
            body_limit: max_payload_mb * 1000 * 1000,
        })
    }

    pub async fn run(&self) -> Result<()> {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_credentials(false)
            .max_age(Duration::from_secs(3600));

        let app = Router::new()
            .route("/analytics-action", post(analytics_action))
            .route("/analytics-insertinto", post(analytics_insertinto))
            .route("/analytics-search", post(analytics_search))
            .route("/analytics-viewall", post(analytics_viewall))
            .route("/analytics-report", post(analytics_report))
            .route("/analytics-report-list", post(analytics_report_list))
            .route("/analytics-delete", post(analytics_delete))
            .route("/analytics-delete-all", post(analytics_delete_all))
            .route("/dashboard", post(dashboard))
            .route("/fileupload", post(file_upload))
            .with_state(self.state.clone())
            .layer(DefaultBodyLimit::max(self.body_limit))
            .layer(cors);

        let addr = self.config.address.clone() + ":" + &self.config.port.to_string();
        let addr: SocketAddr = addr.parse()?;

        info!("API server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;

        axum::Server::from_tcp(listener.into_std()?)?
            .serve(app.into_make_service())
            .await?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    token: Option<String>,
    message: Option<String>,
    camera_id: Option<String>,
    action: Option<String>,
    status: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct InsertIntoRequest {
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ViewAllRequest {
    token: Option<String>,
    row_count: Option<i64>,
    analytics_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ReportRequest {
    start_date: String,
    end_date: String,
}

#[derive(Debug, Deserialize, Default)]
struct DeleteRequest {
    analytics_id: Option<i64>,
}

/// Direct upload: multipart image + video plus optional form fields
async fn analytics_action(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    let mut image = None;
    let mut video = None;
    let mut action_text = None;
    let mut user_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from(Error::Validation(format!("Malformed upload: {}", e))))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") | Some("video") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::from(Error::Validation(format!("Failed to read upload: {}", e)))
                })?;
                let payload = MediaPayload {
                    filename,
                    bytes: bytes.to_vec(),
                };
                if name.as_deref() == Some("image") {
                    image = Some(payload);
                } else {
                    video = Some(payload);
                }
            }
            Some("action_text") => {
                action_text = Some(field.text().await.map_err(|e| {
                    ApiError::from(Error::Validation(format!("Failed to read field: {}", e)))
                })?);
            }
            Some("user_id") => {
                user_id = Some(field.text().await.map_err(|e| {
                    ApiError::from(Error::Validation(format!("Failed to read field: {}", e)))
                })?);
            }
            _ => {}
        }
    }

    let receipt = state
        .ingestion
        .ingest_upload(image, video, action_text, user_id)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Action added successfully",
        "log_image": receipt.log_image,
        "log_video": receipt.log_video,
    })))
}

/// Synthetic ingestion from the configured seed directories
async fn analytics_insertinto(
    State(state): State<AppState>,
    body: Option<Json<InsertIntoRequest>>,
) -> ApiResult<Json<serde_json::Value>> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let receipt = state.ingestion.ingest_synthetic(request.user_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Record inserted successfully",
        "log_image": receipt.log_image,
        "log_video": receipt.log_video,
    })))
}

async fn analytics_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let filters = SearchFilters {
        message: request.message,
        camera_id: request.camera_id,
        action: request.action,
        status: request.status,
        user_id: request.user_id,
    };

    let records = state
        .query
        .search(request.token.as_deref(), &filters)
        .await?;

    Ok(Json(json!({ "status": "success", "data": records })))
}

async fn analytics_viewall(
    State(state): State<AppState>,
    Json(request): Json<ViewAllRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let records = state
        .query
        .view_all(
            request.token.as_deref(),
            request.analytics_id,
            request.row_count,
        )
        .await?;

    Ok(Json(json!({ "status": "success", "data": records })))
}

/// Document form of the report
async fn analytics_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let path = state
        .report
        .generate(&request.start_date, &request.end_date)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Report generated successfully.",
        "report_path": path,
    })))
}

/// Listing form of the report
async fn analytics_report_list(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let rows = state
        .report
        .list(&request.start_date, &request.end_date)
        .await?;

    Ok(Json(json!({ "status": "success", "data": rows })))
}

async fn analytics_delete(
    State(state): State<AppState>,
    body: Option<Json<DeleteRequest>>,
) -> ApiResult<Json<serde_json::Value>> {
    let analytics_id = body
        .map(|Json(r)| r)
        .unwrap_or_default()
        .analytics_id
        .ok_or_else(|| ApiError::from(Error::Validation("analytics_id is required".to_string())))?;

    state.query.delete(analytics_id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Record deleted successfully",
    })))
}

async fn analytics_delete_all(
    State(state): State<AppState>,
) -> ApiResult<Json<serde_json::Value>> {
    state.query.delete_all().await?;

    Ok(Json(json!({
        "status": "success",
        "message": "All records deleted successfully",
    })))
}

async fn dashboard(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let summary = state
        .aggregation
        .summarize(&request.start_date, &request.end_date)
        .await?;

    Ok(Json(serde_json::to_value(summary).map_err(|e| {
        ApiError::from(Error::Internal(format!("Failed to serialize summary: {}", e)))
    })?))
}

/// Generic single-file upload with extension allow-listing
async fn file_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from(Error::Validation(format!("Malformed upload: {}", e))))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(|e| {
                ApiError::from(Error::Validation(format!("Failed to read upload: {}", e)))
            })?;
            file = Some(MediaPayload {
                filename,
                bytes: bytes.to_vec(),
            });
        }
    }

    let file =
        file.ok_or_else(|| ApiError::from(Error::Validation("No file part".to_string())))?;
    let filename = file.filename.clone();
    let path = state.ingestion.upload_file(file).await?;

    Ok(Json(json!({
        "status": "success",
        "message": format!("File uploaded successfully: {}", filename),
        "file_path": path,
    })))
}
