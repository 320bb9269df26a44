use async_graphql::Value;
use serde::Serialize;

use crate::gql::resolver::ResolverResult;

/// Converts a record into the value handed back to the executor.
pub fn to_value<T: Serialize>(record: &T) -> ResolverResult<Value> {
    let json = serde_json::to_value(record).map_err(anyhow::Error::from)?;
    Ok(Value::from_json(json).map_err(anyhow::Error::from)?)
}
