//! HTTP-level tests for the SEO, robots and redirect routes.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use db::DBService;
use serde_json::{Value, json};
use server::{AppState, config::ServerConfig, create_router};
use tower::ServiceExt;

async fn test_router() -> Router {
    let db = DBService::new_in_memory()
        .await
        .expect("Failed to create in-memory database");
    let config = ServerConfig {
        site_url: "https://acmespace.example".to_string(),
        ..Default::default()
    };
    create_router(AppState::new(db, config))
}

async fn json_request(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn text_request(router: &Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn valid_seo(page_path: &str) -> Value {
    json!({
        "page_path": page_path,
        "page_type": "location",
        "seo_title": "Modular Office Rentals in Dallas | Acme Space",
        "seo_description": "Rent modular offices, classrooms and site trailers in Dallas. Delivery, setup and ongoing service included with every lease from Acme Space.",
        "focus_keyword": "modular office rental",
        "seo_keywords": ["modular office", "site trailer", "portable classroom", "dallas", "lease"],
        "canonical_url": "https://acmespace.example/locations/dallas",
        "og_image": "https://acmespace.example/img/dallas.jpg"
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let router = test_router().await;
    let (status, body) = json_request(&router, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn validate_returns_report_without_saving() {
    let router = test_router().await;
    let (status, body) = json_request(
        &router,
        "POST",
        "/api/seo/validate",
        Some(json!({
            "page_path": "/",
            "seo_title": "",
            "seo_description": "A short site.",
            "seo_keywords": []
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let report = &body["data"];
    assert_eq!(report["is_valid"], false);
    assert_eq!(report["issues"][0]["field"], "seo_title");
    assert_eq!(report["warnings"][0]["field"], "seo_description");

    let (_, list) = json_request(&router, "GET", "/api/seo", None).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn save_rejects_invalid_metadata_with_report() {
    let router = test_router().await;
    let (status, body) = json_request(
        &router,
        "PUT",
        "/api/seo",
        Some(json!({ "page_path": "/inventory", "custom_json_ld": "{not valid json" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    let fields: Vec<_> = body["error_data"]["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["seo_title", "seo_description", "custom_json_ld"]);
}

#[tokio::test]
async fn save_load_preview_delete_cycle() {
    let router = test_router().await;

    let (status, body) =
        json_request(&router, "PUT", "/api/seo", Some(valid_seo("/locations/dallas"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["report"]["score"], 100);
    assert_eq!(body["data"]["record"]["page_type"], "location");

    let (status, body) =
        json_request(&router, "GET", "/api/seo/page?path=/locations/dallas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["seo_keywords"][3], "dallas");

    let (status, body) =
        json_request(&router, "GET", "/api/seo/preview?path=/locations/dallas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["social"]["twitter_title"], "Modular Office Rentals in Dallas | Acme Space");
    assert!(
        body["data"]["head_html"]
            .as_str()
            .unwrap()
            .contains(r#"<meta name="twitter:card" content="summary_large_image">"#)
    );

    let (status, _) =
        json_request(&router, "DELETE", "/api/seo/page?path=/locations/dallas", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
        json_request(&router, "DELETE", "/api/seo/page?path=/locations/dallas", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn editor_gets_defaults_for_unknown_page() {
    let router = test_router().await;
    let (status, body) =
        json_request(&router, "GET", "/api/seo/page?path=/case-studies/new", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page_path"], "/case-studies/new");
    assert_eq!(body["data"]["robots_index"], true);
    assert_eq!(body["data"]["page_type"], "page");
}

#[tokio::test]
async fn blank_page_path_is_a_bad_request() {
    let router = test_router().await;
    let mut payload = valid_seo("   ");
    payload["page_path"] = json!("   ");
    let (status, _) = json_request(&router, "PUT", "/api/seo", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn robots_txt_defaults_then_saved_content() {
    let router = test_router().await;

    let (status, text) = text_request(&router, "/robots.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("Disallow: /admin"));
    assert!(text.contains("Sitemap: https://acmespace.example/sitemap.xml"));

    let (status, body) = json_request(
        &router,
        "PUT",
        "/api/robots",
        Some(json!({ "content": "Allow: /\n" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_data"]["is_valid"], false);

    let content = "User-agent: *\nDisallow: /quote\nSitemap: https://acmespace.example/sitemap.xml\n";
    let (status, body) = json_request(
        &router,
        "PUT",
        "/api/robots",
        Some(json!({ "content": content })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_valid"], true);

    let (_, text) = text_request(&router, "/robots.txt").await;
    assert_eq!(text, content);
}

#[tokio::test]
async fn robots_generate_and_validate() {
    let router = test_router().await;
    let (status, body) = json_request(
        &router,
        "POST",
        "/api/robots/generate",
        Some(json!({
            "rules": [{ "user_agent": "*", "disallow": ["/admin"], "crawl_delay": 2 }],
            "sitemaps": ["https://acmespace.example/sitemap.xml"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let content = body["data"]["content"].as_str().unwrap().to_string();
    assert!(content.starts_with("User-agent: *\nDisallow: /admin\nCrawl-delay: 2\n"));

    let (_, body) = json_request(
        &router,
        "POST",
        "/api/robots/validate",
        Some(json!({ "content": content })),
    )
    .await;
    assert_eq!(body["data"]["is_valid"], true);
}

#[tokio::test]
async fn redirect_crud_and_resolution() {
    let router = test_router().await;

    let (status, body) = json_request(
        &router,
        "POST",
        "/api/redirects",
        Some(json!({ "source_path": "/old-inventory", "destination": "/inventory" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status_code"], 301);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = json_request(
        &router,
        "POST",
        "/api/redirects",
        Some(json!({ "source_path": "/inventory", "destination": "/old-inventory" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error_data"][0].as_str().unwrap().contains("loop"));

    let (_, body) =
        json_request(&router, "GET", "/api/redirects/resolve?path=/old-inventory", None).await;
    assert_eq!(body["data"]["destination"], "/inventory");

    let (status, body) = json_request(
        &router,
        "PUT",
        &format!("/api/redirects/{}", id),
        Some(json!({
            "source_path": "/old-inventory",
            "destination": "/inventory/all",
            "status_code": 308
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status_code"], 308);

    let (status, _) =
        json_request(&router, "DELETE", &format!("/api/redirects/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) =
        json_request(&router, "GET", "/api/redirects/resolve?path=/old-inventory", None).await;
    assert!(body["data"].is_null());
}
