use async_graphql::Variables;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Query missing in request body")]
    MissingBody,

    #[error("Invalid GraphQL request: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Query missing in request body")]
    MissingQuery,

    #[error("Invalid GraphQL request: variables must be an object")]
    InvalidVariables,
}

/// A decoded GraphQL request. `variables` is empty, never absent, when the
/// caller sent none.
#[derive(Debug, Clone, Default)]
pub struct QueryDocument {
    pub query: String,
    pub operation_name: Option<String>,
    pub variables: Variables,
}

impl QueryDocument {
    pub fn into_request(self) -> async_graphql::Request {
        let mut request = async_graphql::Request::new(self.query).variables(self.variables);
        if let Some(operation_name) = self.operation_name {
            request = request.operation_name(operation_name);
        }
        request
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequest {
    query: Option<String>,
    operation_name: Option<String>,
    variables: Option<serde_json::Value>,
}

/// Decodes a POST body of the form `{query, operationName, variables}`.
pub fn decode(body: &[u8]) -> Result<QueryDocument, DecodeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DecodeError::MissingBody);
    }

    let raw: RawRequest = serde_json::from_slice(body)?;

    let query = match raw.query {
        Some(query) if !query.trim().is_empty() => query,
        _ => return Err(DecodeError::MissingQuery),
    };

    let variables = match raw.variables {
        None | Some(serde_json::Value::Null) => Variables::default(),
        Some(value @ serde_json::Value::Object(_)) => Variables::from_json(value),
        Some(_) => return Err(DecodeError::InvalidVariables),
    };

    Ok(QueryDocument {
        query,
        operation_name: raw.operation_name.filter(|name| !name.is_empty()),
        variables,
    })
}
