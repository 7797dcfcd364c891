//! HTTP API over the [`DataService`].
//!
//! | Route | Success | Failure |
//! |---|---|---|
//! | `GET /api/data/sheets` | JSON array of sheet names | 500 `{"error":"Failed to list sheets"}` |
//! | `GET /api/data?sheet=<name>` | JSON array of records | 500 `{"error":"Failed to load data"}` |
//! | anything else | the static fallback document | |
//!
//! Both data routes also answer with a trailing slash.
//!
//! All routes allow cross-origin requests from any origin.

use crate::error::Error;
use crate::service::DataService;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

/// Shared handler state.
pub type AppState = Arc<DataService>;

/// Query string of `GET /api/data`.
#[derive(Debug, Default, Deserialize)]
pub struct DataQuery {
    pub sheet: Option<String>,
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// Failures surfaced by the API. Details are logged, never sent.
#[derive(Debug)]
pub enum ApiError {
    ListSheets(Error),
    LoadData(Error),
}

impl ApiError {
    /// Fixed message sent to clients.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::ListSheets(_) => "Failed to list sheets",
            ApiError::LoadData(_) => "Failed to load data",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.message();
        match &self {
            ApiError::ListSheets(err) | ApiError::LoadData(err) => {
                tracing::error!(error = %err, "{}", message);
            }
        }

        let body = ErrorBody {
            error: message.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Build the application router.
pub fn router(service: AppState, static_file: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/api/data", get(load_data))
        .route("/api/data/", get(load_data))
        .route("/api/data/sheets", get(list_sheets))
        .route("/api/data/sheets/", get(list_sheets))
        .fallback_service(ServeFile::new(static_file.as_ref()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn list_sheets(State(service): State<AppState>) -> Result<Response, ApiError> {
    let names = service
        .list_sheet_names()
        .await
        .map_err(ApiError::ListSheets)?;
    Ok(Json(names).into_response())
}

async fn load_data(
    State(service): State<AppState>,
    query: Result<Query<DataQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    // Malformed queries (a repeated `sheet`) fail like unknown sheets
    let Query(query) =
        query.map_err(|rejection| ApiError::LoadData(Error::InvalidData(rejection.body_text())))?;

    let records = service
        .load_sheet(query.sheet.as_deref())
        .await
        .map_err(ApiError::LoadData)?;
    Ok(Json(records.as_slice()).into_response())
}
