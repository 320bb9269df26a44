use async_graphql::Value;
use serde::Serialize;

use super::error::ErrorRecord;

/// Body of a 200 response. `errors` is left out entirely when empty.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsePayload {
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorRecord>,
}

/// Fails only when `data` cannot be represented as JSON.
pub fn assemble(
    data: Value,
    errors: Vec<ErrorRecord>,
) -> Result<ResponsePayload, serde_json::Error> {
    Ok(ResponsePayload {
        data: data.into_json()?,
        errors,
    })
}
