//! End-to-end tests of the HTTP routes over generated workbooks.

#![cfg(feature = "server")]

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::optical_workbook;
use optidata::{DataService, WorkbookLoader};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

fn app_for(data_file: &Path, static_file: &Path) -> (Router, Arc<DataService>) {
    let service = Arc::new(DataService::new(WorkbookLoader::new(data_file)));
    (optidata::api::router(Arc::clone(&service), static_file), service)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_list_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let data = optical_workbook().write_to(&dir, "data.xlsx");
    let (app, _) = app_for(&data, &dir.path().join("index.html"));

    let (status, body) = get(app, "/api/data/sheets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Au", "Ag"]));
}

#[tokio::test]
async fn test_load_named_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let data = optical_workbook().write_to(&dir, "data.xlsx");
    let (app, service) = app_for(&data, &dir.path().join("index.html"));

    let (status, body) = get(app, "/api/data?sheet=Au").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "material": "Gold", "wavelength": 600.0, "n": 0.2, "k": 3.5,
            "Re_e": null, "Im_e": null, "Q": null, "PL": null,
            "Con": null, "Q_PL": null, "Q_con": null
        }])
    );
    assert!(service.cache().contains("Au"));
    assert!(!service.cache().contains("Ag"));
}

#[tokio::test]
async fn test_default_sheet_is_first() {
    let dir = tempfile::tempdir().unwrap();
    let data = optical_workbook().write_to(&dir, "data.xlsx");
    let (app, _) = app_for(&data, &dir.path().join("index.html"));

    let (_, without_param) = get(app.clone(), "/api/data").await;
    let (_, empty_param) = get(app.clone(), "/api/data?sheet=").await;
    let (_, named) = get(app, "/api/data?sheet=Au").await;

    assert_eq!(without_param, named);
    assert_eq!(empty_param, named);
}

#[tokio::test]
async fn test_aliases_and_blank_rows() {
    let dir = tempfile::tempdir().unwrap();
    let data = optical_workbook().write_to(&dir, "data.xlsx");
    let (app, _) = app_for(&data, &dir.path().join("index.html"));

    let (status, body) = get(app, "/api/data?sheet=Ag").await;
    assert_eq!(status, StatusCode::OK);

    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0]["material"], "Silver");
    assert_eq!(records[0]["wavelength"], 450.0);
    assert_eq!(records[0]["n"], 0.05);
    assert_eq!(records[0]["Q_PL"], 0.8);

    assert_eq!(records[1]["material"], "Unknown");
    assert_eq!(records[1]["wavelength"], 500.0);
    assert_eq!(records[1]["n"], Value::Null);
}

#[tokio::test]
async fn test_unknown_sheet_fails_without_caching() {
    let dir = tempfile::tempdir().unwrap();
    let data = optical_workbook().write_to(&dir, "data.xlsx");
    let (app, service) = app_for(&data, &dir.path().join("index.html"));

    let (status, body) = get(app, "/api/data?sheet=Missing").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to load data" }));
    assert!(service.cache().is_empty());
}

#[tokio::test]
async fn test_repeated_sheet_parameter_fails_as_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let data = optical_workbook().write_to(&dir, "data.xlsx");
    let (app, service) = app_for(&data, &dir.path().join("index.html"));

    for uri in ["/api/data?sheet=Au&sheet=Ag", "/api/data?sheet=Au&sheet=Au"] {
        let (status, body) = get(app.clone(), uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body, json!({ "error": "Failed to load data" }), "{uri}");
    }
    assert!(service.cache().is_empty());
}

#[tokio::test]
async fn test_trailing_slash_routes() {
    let dir = tempfile::tempdir().unwrap();
    let data = optical_workbook().write_to(&dir, "data.xlsx");
    let (app, _) = app_for(&data, &dir.path().join("index.html"));

    let (status, body) = get(app.clone(), "/api/data/sheets/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Au", "Ag"]));

    let (status, body) = get(app, "/api/data/?sheet=Au").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["material"], "Gold");
}

#[tokio::test]
async fn test_missing_data_file() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = app_for(&dir.path().join("absent.xlsx"), &dir.path().join("index.html"));

    let (status, body) = get(app.clone(), "/api/data/sheets").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to list sheets" }));

    let (status, body) = get(app, "/api/data").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to load data" }));
}

#[tokio::test]
async fn test_load_retries_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.xlsx");
    let (app, _) = app_for(&path, &dir.path().join("index.html"));

    let (status, _) = get(app.clone(), "/api/data/sheets").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    optical_workbook().write_to(&dir, "data.xlsx");
    let (status, body) = get(app, "/api/data/sheets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Au", "Ag"]));
}

#[tokio::test]
async fn test_cors_header() {
    let dir = tempfile::tempdir().unwrap();
    let data = optical_workbook().write_to(&dir, "data.xlsx");
    let (app, _) = app_for(&data, &dir.path().join("index.html"));

    let response = app
        .oneshot(
            Request::get("/api/data/sheets")
                .header(header::ORIGIN, "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_fallback_serves_static_document() {
    let dir = tempfile::tempdir().unwrap();
    let data = optical_workbook().write_to(&dir, "data.xlsx");
    let page = dir.path().join("index.html");
    std::fs::write(&page, "<html>optidata</html>").unwrap();
    let (app, _) = app_for(&data, &page);

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<html>optidata</html>");
}
