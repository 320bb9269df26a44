use async_graphql::Value;

use super::collect::FieldErrors;
use super::error::ErrorRecord;
use super::order::restore_selection_order;
use super::request::QueryDocument;
use super::schema::ExecutableSchema;

/// Raw result of executing one document, before error classification.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub data: Value,
    pub errors: Vec<ErrorRecord>,
}

/// Executes `document` against `schema`.
///
/// Syntax and validation failures stop before any resolver runs and yield no
/// data. Otherwise every field resolves independently: a failing field is set
/// to null and contributes exactly one error, its siblings are unaffected.
pub async fn execute(schema: &ExecutableSchema, document: QueryDocument) -> ExecutionOutcome {
    let field_errors = FieldErrors::default();
    let mut request = document.into_request().data(field_errors.clone());

    // The executor reuses the parsed document kept on the request.
    let parsed = match request.parsed_query() {
        Ok(parsed) => parsed.clone(),
        Err(err) => {
            tracing::debug!(error = %err.message, "query rejected by parser");
            return ExecutionOutcome {
                data: Value::Null,
                errors: vec![ErrorRecord::syntax(err)],
            };
        }
    };
    let operation_name = request.operation_name.clone();

    let response = schema.inner().execute(request).await;

    let mut errors = field_errors.take();
    errors.extend(
        response
            .errors
            .into_iter()
            .map(ErrorRecord::from_server_error)
            .filter(|record| !record.is_already_recorded()),
    );

    let mut data = response.data;
    restore_selection_order(&mut data, &parsed, operation_name.as_deref());

    ExecutionOutcome { data, errors }
}
