// =============================================================================
// REST API Endpoints -- Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`:
//
//   GET  /api/v1/health               liveness + state version
//   POST /api/v1/sheets               upload a CSV, compute the derived sheet
//   GET  /api/v1/sheets/:id           metadata + preview of a stored sheet
//   GET  /api/v1/sheets/:id/download  full result CSV as an attachment
//
// The upload handler is the only writer: it computes the sheet once, stores
// the rendered CSV under a fresh UUID, and returns that handle so the
// download endpoint can serve the exact same bytes later.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Json, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::app_state::{AppState, StoredSheet};
use crate::indicators::calculate_adx_sheet;
use crate::sheet::io;

/// Filename offered for the CSV download attachment.
const DOWNLOAD_FILENAME: &str = "adx_output.csv";

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = DefaultBodyLimit::max(state.runtime_config.max_upload_bytes);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/sheets", post(upload_sheet))
        .route("/api/v1/sheets/:id", get(sheet_metadata))
        .route("/api/v1/sheets/:id/download", get(download_sheet))
        .layer(cors)
        .layer(body_limit)
        .with_state(state)
}

// =============================================================================
// Error helpers
// =============================================================================

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_request(message: String) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
}

fn sheet_not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "No output to download. Upload and process a file first.",
        })),
    )
}

// =============================================================================
// Health (public)
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    stored_sheets: usize,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        stored_sheets: state.sheet_count(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Upload & compute
// =============================================================================

#[derive(Serialize)]
struct SheetResponse {
    id: String,
    filename: Option<String>,
    created_at: String,
    row_count: usize,
    columns: Vec<String>,
    preview: Vec<Vec<String>>,
}

impl SheetResponse {
    fn from_stored(sheet: &StoredSheet) -> Self {
        Self {
            id: sheet.id.to_string(),
            filename: sheet.filename.clone(),
            created_at: sheet.created_at.clone(),
            row_count: sheet.row_count,
            columns: sheet.columns.clone(),
            preview: sheet.preview.clone(),
        }
    }
}

async fn upload_sheet(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<SheetResponse>, ApiError> {
    let mut upload: Option<(Option<String>, axum::body::Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("failed to read upload: {e}")))?;
            upload = Some((filename, data));
            break;
        }
    }

    let Some((filename, data)) = upload else {
        warn!("Upload request without a 'file' field");
        return Err(bad_request("Please upload a CSV file.".to_string()));
    };
    if data.is_empty() {
        return Err(bad_request("Uploaded file is empty.".to_string()));
    }

    let table = io::parse_csv(&data).map_err(|e| {
        warn!(error = %e, "Rejected unreadable CSV upload");
        bad_request(format!("Error processing file: {e}"))
    })?;

    let sheet = calculate_adx_sheet(&table).map_err(|e| {
        warn!(error = %e, "Sheet computation rejected the upload");
        bad_request(format!("Error processing file: {e}"))
    })?;

    let precision = state.runtime_config.output_precision;
    let rendered = io::render_sheet(&sheet, precision);
    let csv = io::to_csv(&rendered).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": format!("failed to render output: {e}") })),
        )
    })?;

    let preview: Vec<Vec<String>> = rendered
        .rows
        .iter()
        .take(state.runtime_config.preview_rows)
        .cloned()
        .collect();

    let stored = StoredSheet {
        id: Uuid::new_v4(),
        filename,
        created_at: chrono::Utc::now().to_rfc3339(),
        row_count: rendered.rows.len(),
        columns: rendered.headers.clone(),
        csv,
        preview,
    };
    let response = SheetResponse::from_stored(&stored);

    info!(
        id = %stored.id,
        rows = stored.row_count,
        filename = stored.filename.as_deref().unwrap_or("-"),
        "Sheet computed and stored"
    );
    state.insert_sheet(stored);

    Ok(Json(response))
}

// =============================================================================
// Stored sheet metadata
// =============================================================================

async fn sheet_metadata(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SheetResponse>, ApiError> {
    let sheet = lookup(&state, &id)?;
    Ok(Json(SheetResponse::from_stored(&sheet)))
}

// =============================================================================
// Download
// =============================================================================

async fn download_sheet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let sheet = lookup(&state, &id)?;
    info!(id = %sheet.id, rows = sheet.row_count, "Serving CSV download");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_FILENAME}\""),
            ),
        ],
        sheet.csv,
    )
        .into_response())
}

/// Resolve a path id to a stored sheet. Unknown and malformed ids both map
/// to the same 404 so handles are not probeable.
fn lookup(state: &AppState, id: &str) -> Result<StoredSheet, ApiError> {
    let id = Uuid::parse_str(id).map_err(|_| sheet_not_found())?;
    state.get_sheet(&id).ok_or_else(sheet_not_found)
}

// =============================================================================
// Tests
// =============================================================================
