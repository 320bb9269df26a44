mod common;

use std::sync::Arc;

use common::*;
use serde_json::json;

#[tokio::test]
async fn test_resolver_failure_is_redacted() {
    let schema = schema_with(Arc::new(FailingCatalog::new(
        "connection refused: catalog-db.internal:5432",
    )));

    let response = execute_graphql(&schema, r#"{ productById(id:"42"){ id name } }"#, None).await;

    let errors = response["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    let error = &errors[0];
    assert_eq!(error["extensions"]["code"], "INTERNAL_SERVER_EXCEPTION");
    assert_eq!(error["path"], json!(["productById"]));
    assert!(!error["locations"].as_array().unwrap().is_empty());

    let message = error["message"].as_str().unwrap();
    assert!(!message.contains("connection refused"));
    assert!(!response.to_string().contains("catalog-db.internal"));
    assert_eq!(response["data"], json!({ "productById": null }));
}

#[tokio::test]
async fn test_internal_and_client_errors_are_both_counted() {
    let schema = schema_with(Arc::new(FailingCatalog::new("timeout")));

    let response = execute_graphql(
        &schema,
        r#"{ a: productById(id:"1"){ id } b: productById(id:""){ id } }"#,
        None,
    )
    .await;

    let errors = response["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    let codes: Vec<_> = errors
        .iter()
        .map(|e| e["extensions"]["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"INTERNAL_SERVER_EXCEPTION"));
    assert!(codes.contains(&"BAD_USER_INPUT"));
}

#[tokio::test]
async fn test_syntax_error_passes_through() {
    let schema = sample_schema();

    let response = execute_graphql(&schema, r#"{ productById(id:"1") { id }"#, None).await;

    assert_eq!(response["data"], serde_json::Value::Null);
    let errors = response["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["extensions"]["code"], "GRAPHQL_PARSE_FAILED");
    assert_ne!(errors[0]["message"], "Internal server error");
    assert!(errors[0].get("path").is_none());
}

#[tokio::test]
async fn test_validation_error_passes_through() {
    let schema = sample_schema();

    let response = execute_graphql(&schema, r#"{ productById(id:"1") { id price } }"#, None).await;

    assert_eq!(response["data"], serde_json::Value::Null);
    let errors = response["errors"].as_array().unwrap();
    assert!(!errors.is_empty());
    for error in errors {
        assert_eq!(error["extensions"]["code"], "GRAPHQL_VALIDATION_FAILED");
        assert!(error["message"].as_str().unwrap().contains("price"));
    }
}

#[tokio::test]
async fn test_successful_response_has_no_errors_key() {
    let schema = sample_schema();

    let response = execute_graphql(&schema, r#"{ productById(id:"1") { id } }"#, None).await;

    assert_eq!(response, json!({ "data": { "productById": { "id": 1 } } }));
}
