//! REST API Server for complaint triage
//!
//! Exposes upload, chatbot, resolution, keyword, report and operator
//! endpoints over HTTP for the dashboard front end.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::TriageError;
use crate::models::Status;
use crate::service::TriageService;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ComplaintUpdate {
    pub id: i64,
    pub status: String,
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct KeywordAdd {
    pub category: String,
    pub word: String,
}

#[derive(Debug, Deserialize)]
pub struct UserRegister {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UserLogin {
    pub email: String,
    pub password: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

type ApiResult = (StatusCode, Json<ApiResponse>);

fn ok<T: Serialize>(data: T) -> ApiResult {
    (StatusCode::OK, Json(ApiResponse::success(data)))
}

fn failure(error: TriageError) -> ApiResult {
    let status = match &error {
        TriageError::InvalidUpload(_)
        | TriageError::InvalidRequest(_)
        | TriageError::CsvError(_) => StatusCode::BAD_REQUEST,
        TriageError::NotFound(_) => StatusCode::NOT_FOUND,
        TriageError::AuthError(_) => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        warn!("Request failed: {}", error);
    }
    (status, Json(ApiResponse::error(error.to_string())))
}

fn respond<T: Serialize>(result: crate::Result<T>) -> ApiResult {
    match result {
        Ok(data) => ok(data),
        Err(e) => failure(e),
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<TriageService>,
}

/// =============================
/// Health Endpoints
/// =============================

async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Complaint triage backend is running"
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Upload & Chat
/// =============================

async fn analyze(State(state): State<ApiState>, body: Bytes) -> ApiResult {
    info!("Received complaint upload ({} bytes)", body.len());
    respond(state.service.analyze_upload(&body).await)
}

async fn chat(State(state): State<ApiState>, Json(req): Json<ChatRequest>) -> ApiResult {
    info!("Received chat query: {}", req.query);
    respond(state.service.chat(&req.query).await)
}

/// =============================
/// Dashboard
/// =============================

async fn dashboard_stats(State(state): State<ApiState>) -> ApiResult {
    respond(state.service.metrics().await)
}

async fn all_complaints(State(state): State<ApiState>) -> ApiResult {
    respond(state.service.all_complaints().await)
}

async fn generate_report(State(state): State<ApiState>) -> Response {
    let today = chrono::Local::now().date_naive();

    match state.service.report(today).await {
        Ok(report) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=complaint_report.txt",
                ),
            ],
            report,
        )
            .into_response(),
        Err(e) => failure(e).into_response(),
    }
}

/// =============================
/// Ticket Resolution
/// =============================

async fn update_complaint(
    State(state): State<ApiState>,
    Json(req): Json<ComplaintUpdate>,
) -> ApiResult {
    let status = match req.status.parse::<Status>() {
        Ok(status) => status,
        Err(e) => return failure(e),
    };

    respond(
        state
            .service
            .update_complaint(req.id, status, &req.action)
            .await,
    )
}

/// =============================
/// Keywords
/// =============================

async fn get_keywords(State(state): State<ApiState>) -> ApiResult {
    ok(state.service.keywords().as_ref())
}

async fn add_keyword(State(state): State<ApiState>, Json(req): Json<KeywordAdd>) -> ApiResult {
    match state.service.add_keyword(&req.category, &req.word).await {
        Ok(true) => ok(serde_json::json!({
            "message": format!(
                "Added '{}' to category '{}'",
                req.word.trim().to_lowercase(),
                req.category.trim()
            )
        })),
        Ok(false) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Keyword already exists".to_string())),
        ),
        Err(e) => failure(e),
    }
}

/// =============================
/// Operators
/// =============================

async fn register(State(state): State<ApiState>, Json(req): Json<UserRegister>) -> ApiResult {
    match state
        .service
        .register(&req.email, &req.password, &req.full_name)
        .await
    {
        Ok(true) => ok(serde_json::json!({ "message": "User registered successfully" })),
        Ok(false) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Email already exists".to_string())),
        ),
        Err(e) => failure(e),
    }
}

async fn login(State(state): State<ApiState>, Json(req): Json<UserLogin>) -> ApiResult {
    respond(state.service.login(&req.email, &req.password).await)
}

/// =============================
/// Router
/// =============================

pub fn create_router(service: Arc<TriageService>) -> Router {
    let state = ApiState { service };

    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/chat", post(chat))
        .route("/dashboard-stats", get(dashboard_stats))
        .route("/all-complaints", get(all_complaints))
        .route("/update-complaint", post(update_complaint))
        .route("/keywords", get(get_keywords))
        .route("/add-keyword", post(add_keyword))
        .route("/generate-report", get(generate_report))
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    service: Arc<TriageService>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(service);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
