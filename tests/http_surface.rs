use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use model_depot::acquire::catalog::{CatalogEntry, CatalogModel, CatalogProvider};
use model_depot::core::{AppContext, ServiceConfig};
use model_depot::http::router;
use model_depot::notify::NullNotifier;
use model_depot::registry::{ArtifactDescriptor, ArtifactSource};

/// Serves a catalog entry that fails the type gate.
struct WrongTypeCatalog;

#[async_trait]
impl CatalogProvider for WrongTypeCatalog {
    async fn entry_by_hash(&self, _content_hash: &str) -> Result<CatalogEntry> {
        Ok(CatalogEntry {
            id: 1,
            model_id: 2,
            base_model: "SD 1.5".into(),
            model: CatalogModel {
                name: "Some LORA".into(),
                kind: "LORA".into(),
            },
            files: vec![],
        })
    }
}

fn app(root: &Path) -> (AppContext, axum::Router) {
    let config = ServiceConfig {
        registry_root: root.to_path_buf(),
        ..ServiceConfig::default()
    };
    let ctx = AppContext::with_collaborators(
        config,
        reqwest::Client::new(),
        Arc::new(WrongTypeCatalog),
        Arc::new(NullNotifier),
    )
    .expect("build app context");
    (ctx.clone(), router(ctx))
}

fn commit_manually(root: &Path, alias: &str, filename: &str, weights: &[u8]) -> ArtifactDescriptor {
    let descriptor = ArtifactDescriptor {
        alias: alias.into(),
        display_name: format!("{alias} model"),
        source: ArtifactSource::Civitai,
        content_hash: "cafe".into(),
        catalog_model_id: 1,
        catalog_version_id: 2,
        catalog_file_id: 3,
        filename: filename.into(),
        download_url: "https://example.invalid/file".into(),
    };
    fs::write(
        descriptor.sidecar_path(root),
        serde_json::to_vec(&descriptor).unwrap(),
    )
    .unwrap();
    fs::write(descriptor.data_path(root), weights).unwrap();
    descriptor
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn models_listing_reflects_committed_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    commit_manually(dir.path(), "b", "b.safetensors", b"bb");
    commit_manually(dir.path(), "a", "a.safetensors", b"aa");
    let (_ctx, app) = app(dir.path());

    let response = app
        .oneshot(Request::builder().uri("/models").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        body,
        serde_json::json!([
            { "alias": "a", "name": "a model" },
            { "alias": "b", "name": "b model" }
        ])
    );
}

#[tokio::test]
async fn pending_listing_shows_admission_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, app) = app(dir.path());
    ctx.admission().try_claim("in-flight");

    let response = app
        .oneshot(Request::builder().uri("/pending").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, serde_json::json!(["in-flight"]));
}

#[tokio::test]
async fn fetching_an_unknown_alias_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (_ctx, app) = app(dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/model/missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fetching_a_committed_alias_streams_its_bytes() {
    let dir = tempfile::tempdir().unwrap();
    commit_manually(dir.path(), "a", "a.safetensors", b"raw weights");
    let (_ctx, app) = app(dir.path());

    let response = app
        .oneshot(Request::builder().uri("/model/a").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/octet-stream"
    );
    assert_eq!(body_bytes(response).await, b"raw weights");
}

#[tokio::test]
async fn policy_rejection_maps_to_unprocessable_entity() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, app) = app(dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/acquire/deadbeef/my-model")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(ctx.admission().snapshot().is_empty());
}

#[tokio::test]
async fn acquiring_a_present_alias_reports_present() {
    let dir = tempfile::tempdir().unwrap();
    commit_manually(dir.path(), "my-model", "m.safetensors", b"mm");
    let (_ctx, app) = app(dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/acquire/cafe/my-model")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "present");
    assert_eq!(body["model"]["alias"], "my-model");
}
