pub mod classify;
pub mod collect;
pub mod common;
pub mod domains;
pub mod engine;
pub mod error;
pub mod order;
pub mod request;
pub mod resolver;
pub mod response;
pub mod schema;

use std::sync::Arc;

use infra::repos::CatalogRepo;

pub use classify::classify;
pub use engine::{execute, ExecutionOutcome};
pub use error::{ErrorKind, ErrorRecord, ResolverError};
pub use request::{decode, DecodeError, QueryDocument};
pub use resolver::{Completion, FieldInput, ResolverRegistry, SelectionSet};
pub use response::{assemble, ResponsePayload};
pub use schema::{build_schema, load_schema, ExecutableSchema, SchemaError, SchemaOptions};

/// Registry holding every resolver the service exposes, backed by `repo`.
pub fn build_registry<R: CatalogRepo>(repo: Arc<R>) -> ResolverRegistry {
    domains::products::register(ResolverRegistry::new(), repo)
}

/// Executes `document`, classifies the errors and assembles the response body.
pub async fn run(
    schema: &ExecutableSchema,
    document: QueryDocument,
) -> Result<ResponsePayload, serde_json::Error> {
    let outcome = execute(schema, document).await;
    let errors = classify(outcome.errors);
    assemble(outcome.data, errors)
}
