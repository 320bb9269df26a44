use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::gql::DecodeError;

/// Failures at the HTTP boundary. All of them answer 400 with a plain-text
/// body; GraphQL-level errors never end up here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Error while serializing the query execution result.")]
    Serialization(#[source] serde_json::Error),

    #[error("INTERNAL_SERVER_ERROR")]
    Execution(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::BadRequest(reason) => tracing::warn!("Rejected request: {reason}"),
            AppError::Decode(e) => tracing::warn!("Rejected request: {e}"),
            AppError::Serialization(e) => {
                tracing::error!("Error while serializing the execution result: {e}")
            }
            AppError::Execution(e) => tracing::error!("Error while executing the query: {e}"),
        }
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::CONTENT_TYPE;

    use super::*;

    async fn plain_text(response: Response) -> (StatusCode, String, String) {
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn dead_execution_task_is_bad_request() {
        let join_err = tokio::spawn(async { panic!("execution task died") })
            .await
            .unwrap_err();

        let (status, content_type, body) = plain_text(AppError::from(join_err).into_response()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(content_type.starts_with("text/plain"), "{content_type}");
        assert_eq!(body, "INTERNAL_SERVER_ERROR");
    }

    #[tokio::test]
    async fn serialization_failure_is_bad_request() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

        let (status, content_type, body) =
            plain_text(AppError::Serialization(err).into_response()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(content_type.starts_with("text/plain"), "{content_type}");
        assert_eq!(body, "Error while serializing the query execution result.");
    }

    #[tokio::test]
    async fn decode_failure_keeps_its_message() {
        let (status, _, body) =
            plain_text(AppError::from(DecodeError::MissingQuery).into_response()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Query missing in request body");
    }
}
