mod common;

use api::app::build_router;
use api::config::AppConfig;
use api::AppState;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use common::sample_schema;

fn app() -> Router {
    build_router(AppState::new(sample_schema(), AppConfig::default()))
}

fn post_graphql(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn read_body(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_query_returns_json() {
    let response = app()
        .oneshot(post_graphql(
            r#"{"query":"{ productById(id:\"42\"){ id name details{ id name } } }"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let body: serde_json::Value = serde_json::from_str(&read_body(response).await).unwrap();
    assert_eq!(body["data"]["productById"]["id"], 42);
    assert_eq!(
        body["data"]["productById"]["details"]
            .as_array()
            .unwrap()
            .len(),
        1
    );
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn test_field_errors_still_return_ok() {
    let response = app()
        .oneshot(post_graphql(
            r#"{"query":"{ productById(id:\"\"){ id } }","variables":null}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&read_body(response).await).unwrap();
    assert_eq!(body["errors"][0]["extensions"]["code"], "BAD_USER_INPUT");
}

#[tokio::test]
async fn test_missing_or_empty_query_is_bad_request() {
    for body in ["", "{}", r#"{"query":""}"#, r#"{"query":null}"#, "not json"] {
        let response = app().oneshot(post_graphql(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body:?}");
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default();
        assert!(content_type.starts_with("text/plain"), "{content_type}");
    }
}

#[tokio::test]
async fn test_oversized_body_is_bad_request() {
    let config = AppConfig {
        max_body_bytes: 16,
        ..AppConfig::default()
    };
    let app = build_router(AppState::new(sample_schema(), config));

    let response = app
        .oneshot(post_graphql(r#"{"query":"{ productById(id:\"1\"){ id } }"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_body(response).await, "ok");
}
