//! End-to-end smoke tests for the full georegd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real repos,
//! real reqwest handler factory against a mock server, real services, real
//! axum router) and exercises the HTTP layer via `tower::ServiceExt::oneshot`.
//! Only the mock server binds a TCP port.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use georeg_adapter_http_axum::router;
use georeg_adapter_http_axum::state::AppState;
use georeg_adapter_ows_reqwest::OwsHandlerFactory;
use georeg_adapter_storage_sqlite_sqlx::{Config, SqliteGeoAppRepository, SqliteServiceRepository};
use georeg_app::services::geoapp_service::GeoAppService;
use georeg_app::services::service_catalog::ServiceCatalog;
use georeg_domain::service_type::{ProviderTable, available_service_types};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use tower::ServiceExt;

const WMS_CAPABILITIES: &str = r#"<?xml version="1.0"?>
<WMS_Capabilities version="1.3.0" xmlns="http://www.opengis.net/wms">
  <Service>
    <Title>Topographic maps</Title>
    <Abstract>National basemap</Abstract>
    <KeywordList><Keyword>topo</Keyword></KeywordList>
  </Service>
  <Capability>
    <Layer>
      <EX_GeographicBoundingBox>
        <westBoundLongitude>-10</westBoundLongitude>
        <eastBoundLongitude>30</eastBoundLongitude>
        <southBoundLatitude>35</southBoundLatitude>
        <northBoundLatitude>70</northBoundLatitude>
      </EX_GeographicBoundingBox>
    </Layer>
  </Capability>
</WMS_Capabilities>"#;

/// Build a fully-wired router backed by an in-memory `SQLite` database.
async fn app(type_modules: &[&str]) -> axum::Router {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");

    let pool = db.pool().clone();

    let service_types = available_service_types(type_modules, &ProviderTable::builtin())
        .expect("builtin providers should load");
    let factory = OwsHandlerFactory::new(&georeg_adapter_ows_reqwest::Config {
        timeout: Duration::from_secs(5),
    })
    .expect("http client should build");

    let state = AppState::new(
        ServiceCatalog::new(
            SqliteServiceRepository::new(pool.clone()),
            factory,
            Arc::new(service_types),
        ),
        GeoAppService::new(SqliteGeoAppRepository::new(pool)),
    );

    router::build(state)
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&resp.into_body().collect().await.unwrap().to_bytes()).unwrap()
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let resp = app(&[]).await.oneshot(get("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Service types
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_offer_ogc_types_only_when_provider_configured() {
    let core_only = app(&[]).await.oneshot(get("/api/service-types")).await.unwrap();
    let core_only = body_json(core_only).await;
    let with_ogc = app(&["ogc"]).await.oneshot(get("/api/service-types")).await.unwrap();
    let with_ogc = body_json(with_ogc).await;

    let has = |body: &serde_json::Value, key: &str| {
        body.as_array().unwrap().iter().any(|t| t["key"] == key)
    };
    assert!(has(&core_only, "WMS"));
    assert!(!has(&core_only, "CSW"));
    assert!(has(&with_ogc, "CSW"));
    assert!(has(&with_ogc, "WFS"));
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_complete_service_registration_cycle() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wms")
                .query_param("service", "WMS")
                .query_param("request", "GetCapabilities");
            then.status(200)
                .header("content-type", "text/xml")
                .body(WMS_CAPABILITIES);
        })
        .await;
    let url = server.url("/wms");
    let app = app(&[]).await;

    // Register with auto-detection
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/services",
            &serde_json::json!({"url": url, "type": "AUTO", "username": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["type"], "WMS");
    assert_eq!(created["title"], "Topographic maps");
    assert_eq!(created["keywords"], serde_json::json!(["topo"]));
    assert_eq!(created["extent"]["minx"], -10.0);
    assert!(created["username"].is_null());
    let id = created["id"].as_str().unwrap().to_string();

    // Second registration of the same URL is a conflict
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/services",
            &serde_json::json!({"url": url, "type": "WMS"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Edit
    let resp = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/services/{id}"),
            &serde_json::json!({
                "title": "Renamed",
                "description": "Maps",
                "abstract": "Maps of the country",
                "keywords": "a, b, a"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let edited = body_json(resp).await;
    assert_eq!(edited["title"], "Renamed");
    assert_eq!(edited["keywords"], serde_json::json!(["a", "b"]));

    // List
    let resp = app.clone().oneshot(get("/api/services")).await.unwrap();
    let listed = body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Delete
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/services/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .oneshot(get(&format!("/api/services/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_report_conflict_when_same_url_registered_concurrently() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wms");
            then.status(200)
                .header("content-type", "text/xml")
                .delay(Duration::from_millis(300))
                .body(WMS_CAPABILITIES);
        })
        .await;
    let url = server.url("/wms");
    let app = app(&[]).await;
    let body = serde_json::json!({"url": url, "type": "WMS"});

    let (first, second) = tokio::join!(
        app.clone()
            .oneshot(json_request("POST", "/api/services", &body)),
        app.clone()
            .oneshot(json_request("POST", "/api/services", &body)),
    );
    let mut statuses = vec![first.unwrap().status(), second.unwrap().status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);

    let resp = app.oneshot(get("/api/services")).await.unwrap();
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_refuse_arcgis_type_for_wms_endpoint() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wms").query_param("service", "WMS");
            then.status(200).body(WMS_CAPABILITIES);
        })
        .await;
    let url = server.url("/wms");

    let resp = app(&[])
        .await
        .oneshot(json_request(
            "POST",
            "/api/services",
            &serde_json::json!({"url": url, "type": "REST_MAP"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert_eq!(
        body["error"],
        format!("Could not connect to the service at {url}")
    );
}

#[tokio::test]
async fn should_report_unreachable_service() {
    let server = MockServer::start_async().await;
    let url = server.url("/nothing-here");

    let resp = app(&[])
        .await
        .oneshot(json_request(
            "POST",
            "/api/services",
            &serde_json::json!({"url": url}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn should_reject_non_http_url() {
    let resp = app(&[])
        .await
        .oneshot(json_request(
            "POST",
            "/api/services",
            &serde_json::json!({"url": "ftp://example.com/wms"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// GeoApps
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_complete_geoapp_cycle() {
    let app = app(&[]).await;

    // Anonymous write is refused
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/geoapps",
            &serde_json::json!({"title": "Story"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Create
    let mut req = json_request(
        "POST",
        "/api/geoapps",
        &serde_json::json!({
            "title": "Alpine lakes",
            "data": {"sections": []},
            "extent": {"minx": 5.0, "miny": 44.0, "maxx": 16.0, "maxy": 48.0}
        }),
    );
    req.headers_mut()
        .insert("x-remote-user", "alice".parse().unwrap());
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["owner"], "alice");
    let id = created["id"].as_str().unwrap().to_string();

    // Patch
    let mut req = json_request(
        "PATCH",
        &format!("/api/geoapps/{id}"),
        &serde_json::json!({"abstract": "Lakes of the Alps"}),
    );
    req.headers_mut()
        .insert("x-remote-user", "bob".parse().unwrap());
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let patched = body_json(resp).await;
    assert_eq!(patched["abstract"], "Lakes of the Alps");
    assert_eq!(patched["title"], "Alpine lakes");

    // Extent filter
    let hit = body_json(
        app.clone()
            .oneshot(get("/api/geoapps?extent=10,45,12,47"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(hit["total"], 1);
    let miss = body_json(
        app.clone()
            .oneshot(get("/api/geoapps?extent=-80,-10,-70,0"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(miss["total"], 0);

    // Owner and resource type filters
    let mine = body_json(
        app.clone()
            .oneshot(get("/api/geoapps?owner=alice&resource_type=geostory"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(mine["total"], 1);
    let theirs = body_json(
        app.clone()
            .oneshot(get("/api/geoapps?owner=bob"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(theirs["total"], 0);

    // There is no delete route
    let resp = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/geoapps/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
