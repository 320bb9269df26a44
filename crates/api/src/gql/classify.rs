use super::error::ErrorRecord;

/// Decides what the caller gets to see of each error.
///
/// Syntax, validation and user-input errors pass through untouched. Every
/// other error is logged in full and replaced by a generic error that keeps
/// only the path and locations. The result has one entry per input error, in
/// the same order.
pub fn classify(errors: Vec<ErrorRecord>) -> Vec<ErrorRecord> {
    errors
        .into_iter()
        .map(|error| {
            if error.kind.is_client_safe() {
                return error;
            }
            tracing::error!(
                kind = ?error.kind,
                code = error.code().unwrap_or_default(),
                path = ?error.path,
                locations = ?error.locations,
                detail = %error.detail,
                "Error executing query: {}",
                error.message
            );
            error.redacted()
        })
        .collect()
}
