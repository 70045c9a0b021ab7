//! HTTP request handlers for the document analysis service.
//!
//! Thin plumbing over the analysis pipeline: handlers validate input, bridge
//! to the blocking core via `spawn_blocking`, and map terminal error kinds
//! onto HTTP statuses.

use crate::config::ServerConfig;
use crate::pdf;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use docaudit_analyzer::{Analyzer, AnalyzerError};
use docaudit_domain::traits::DocumentStore;
use docaudit_domain::{AnalysisResult, DocumentId, DocumentSummary, ResultId};
use docaudit_llm::OpenAiProvider;
use docaudit_store::{SqliteStore, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Page size for document listings
const PAGE_SIZE: usize = 20;

/// Upload size cap (bytes)
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Immutable process configuration
    pub config: Arc<ServerConfig>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,
}

/// Upload response
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Assigned document id
    pub doc_id: DocumentId,
    /// Original filename
    pub filename: String,
    /// Extracted text
    pub text: String,
}

/// Paginated document listing
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentListResponse {
    /// One page of documents, newest first
    pub items: Vec<DocumentSummary>,
    /// Total number of stored documents
    pub total: u64,
}

/// Listing query parameters
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Number of documents to skip
    #[serde(default)]
    pub offset: usize,
}

/// A persisted analysis attached to a document detail response
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisView {
    /// Result row id
    pub id: ResultId,
    /// The normalized record
    pub result: AnalysisResult,
    /// Persistence time (Unix epoch seconds)
    pub created_at: u64,
}

/// Document detail response
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentDetailResponse {
    /// Document id
    pub id: DocumentId,
    /// Original filename
    pub filename: String,
    /// Extracted text
    pub text: String,
    /// Creation time (Unix epoch seconds)
    pub created_at: u64,
    /// Most recent analysis, if any
    pub latest_analysis: Option<AnalysisView>,
}

/// Service counters
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Number of stored documents
    pub documents: u64,
    /// Number of stored analysis results
    pub analyses: u64,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type, mapped onto HTTP statuses
#[derive(Debug)]
pub enum AppError {
    /// Client sent an unusable upload
    InvalidUpload(String),
    /// Referenced document does not exist
    DocumentNotFound,
    /// Completion credential is not configured
    Configuration,
    /// Completion service failed or returned unusable output
    Upstream(String),
    /// Internal failure (storage, task join)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidUpload(message) => (StatusCode::BAD_REQUEST, message),
            AppError::DocumentNotFound => {
                (StatusCode::NOT_FOUND, "Document not found".to_string())
            }
            AppError::Configuration => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Completion credential is not configured".to_string(),
            ),
            AppError::Upstream(message) => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<AnalyzerError> for AppError {
    fn from(e: AnalyzerError) -> Self {
        match e {
            AnalyzerError::DocumentNotFound(_) => AppError::DocumentNotFound,
            AnalyzerError::Configuration => AppError::Configuration,
            AnalyzerError::Completion(message) => AppError::Upstream(message),
            AnalyzerError::UnparseableModelOutput => {
                AppError::Upstream("Model returned unparseable JSON".to_string())
            }
            AnalyzerError::Store(message) => AppError::Internal(message),
        }
    }
}

/// Run a closure against a fresh store connection on the blocking pool
///
/// One connection per request: SQLite serializes writers on its own, and the
/// core holds no cross-request state.
async fn with_store<T, F>(config: Arc<ServerConfig>, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&mut SqliteStore) -> Result<T, AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut store = SqliteStore::open(&config.db_path)?;
        f(&mut store)
    })
    .await
    .map_err(|e| AppError::Internal(format!("task join error: {}", e)))?
}

/// GET / and GET /health - liveness check
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// POST /upload - ingest a PDF, extract its text, persist the document
async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidUpload(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .unwrap_or("document.pdf")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidUpload(format!("Failed to read upload: {}", e)))?;
            file = Some((filename, bytes));
            break;
        }
    }

    let (filename, bytes) = file
        .ok_or_else(|| AppError::InvalidUpload("Missing \"file\" field".to_string()))?;

    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(AppError::InvalidUpload(
            "Only PDF files are supported".to_string(),
        ));
    }

    let config = state.config.clone();
    let response = tokio::task::spawn_blocking(move || -> Result<UploadResponse, AppError> {
        let text = pdf::extract_text(&bytes)
            .map_err(|e| AppError::InvalidUpload(format!("Failed to extract PDF text: {}", e)))?;
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(AppError::InvalidUpload(
                "No text could be extracted from the PDF".to_string(),
            ));
        }

        let mut store = SqliteStore::open(&config.db_path)?;
        let doc_id = store.insert_document(&filename, &text, now_epoch_secs())?;

        info!(%doc_id, filename = %filename, text_chars = text.len(), "document uploaded");

        Ok(UploadResponse {
            doc_id,
            filename,
            text,
        })
    })
    .await
    .map_err(|e| AppError::Internal(format!("task join error: {}", e)))??;

    Ok(Json(response))
}

/// POST /analyze/:doc_id - run the analysis pipeline for a stored document
async fn analyze_document(
    State(state): State<AppState>,
    Path(doc_id): Path<i64>,
) -> Result<Json<AnalysisResult>, AppError> {
    let config = state.config.clone();

    let outcome = tokio::task::spawn_blocking(move || -> Result<_, AppError> {
        let store = SqliteStore::open(&config.db_path)?;
        let provider = OpenAiProvider::new(config.api_key.clone(), config.model.clone())
            .with_api_base(config.api_base.clone());

        let mut analyzer = Analyzer::new(provider, store);
        Ok(analyzer.analyze(DocumentId::from_value(doc_id))?)
    })
    .await
    .map_err(|e| AppError::Internal(format!("task join error: {}", e)))??;

    Ok(Json(outcome.result))
}

/// GET /documents - newest-first page of stored documents
async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<DocumentListResponse>, AppError> {
    let response = with_store(state.config.clone(), move |store| {
        let items = store.list_documents(PAGE_SIZE, params.offset)?;
        let total = store.count_documents()?;
        Ok(DocumentListResponse { items, total })
    })
    .await?;

    Ok(Json(response))
}

/// GET /documents/:doc_id - document detail with its most recent analysis
async fn get_document(
    State(state): State<AppState>,
    Path(doc_id): Path<i64>,
) -> Result<Json<DocumentDetailResponse>, AppError> {
    let response = with_store(state.config.clone(), move |store| {
        let id = DocumentId::from_value(doc_id);
        let document = store.get_document(id)?.ok_or(AppError::DocumentNotFound)?;

        let latest_analysis = store.latest_result(id)?.map(|stored| AnalysisView {
            id: stored.id,
            result: stored.result,
            created_at: stored.created_at,
        });

        Ok(DocumentDetailResponse {
            id: document.id,
            filename: document.filename,
            text: document.text,
            created_at: document.created_at,
            latest_analysis,
        })
    })
    .await?;

    Ok(Json(response))
}

/// GET /stats - document and analysis counters
async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let response = with_store(state.config.clone(), |store| {
        Ok(StatsResponse {
            documents: store.count_documents()?,
            analyses: store.count_results()?,
        })
    })
    .await?;

    Ok(Json(response))
}

fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/upload", post(upload_document))
        .route("/analyze/:doc_id", post(analyze_document))
        .route("/documents", get(list_documents))
        .route("/documents/:doc_id", get(get_document))
        .route("/stats", get(stats))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            db_path: dir.path().join("test.sqlite3"),
            ..ServerConfig::default()
        };
        (
            AppState {
                config: Arc::new(config),
            },
            dir,
        )
    }

    #[tokio::test]
    async fn test_health_check() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analyze_unknown_document_is_404() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);

        let request = Request::builder()
            .method("POST")
            .uri("/analyze/999")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stats_on_empty_store() {
        let (state, _dir) = create_test_state();
        let app = create_router(state);

        let request = Request::builder().uri("/stats").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let stats: StatsResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(stats.documents, 0);
        assert_eq!(stats.analyses, 0);
    }
}
