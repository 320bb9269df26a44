use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};

use async_graphql::{ErrorExtensions, PathSegment, Pos, ServerError};
use infra::repos::RepoError;
use serde::Serialize;
use thiserror::Error;

use super::collect::FieldLocation;

pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";
pub const INTERNAL_SERVER_EXCEPTION: &str = "INTERNAL_SERVER_EXCEPTION";
pub const GRAPHQL_PARSE_FAILED: &str = "GRAPHQL_PARSE_FAILED";
pub const GRAPHQL_VALIDATION_FAILED: &str = "GRAPHQL_VALIDATION_FAILED";

/// Message sent to clients in place of an internal error.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Extension set on executor errors whose resolver failure was already
/// recorded with its path.
pub(crate) const RECORDED_EXTENSION: &str = "recordedByResolver";

/// Where an error came from. Decides whether it may reach the client verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed query text.
    Syntax,
    /// Query shape or types do not match the schema.
    Validation,
    /// A resolver rejected an argument supplied by the caller.
    BadUserInput,
    /// Anything else a resolver raised.
    DataFetching,
}

impl ErrorKind {
    pub fn is_client_safe(self) -> bool {
        !matches!(self, ErrorKind::DataFetching)
    }

    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Syntax => GRAPHQL_PARSE_FAILED,
            ErrorKind::Validation => GRAPHQL_VALIDATION_FAILED,
            ErrorKind::BadUserInput => BAD_USER_INPUT,
            ErrorKind::DataFetching => INTERNAL_SERVER_EXCEPTION,
        }
    }
}

/// An error collected while executing a query.
///
/// `kind` and `detail` stay on the server; only the remaining fields are
/// serialized into the response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub message: String,
    #[serde(skip)]
    pub kind: ErrorKind,
    /// Full description for server logs (error chain, panic payload).
    #[serde(skip)]
    pub detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Pos>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
    pub extensions: serde_json::Map<String, serde_json::Value>,
}

impl ErrorRecord {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut extensions = serde_json::Map::new();
        extensions.insert("code".to_string(), kind.code().into());
        Self {
            detail: message.clone(),
            message,
            kind,
            locations: Vec::new(),
            path: Vec::new(),
            extensions,
        }
    }

    /// Query text that failed to parse.
    pub fn syntax(err: ServerError) -> Self {
        let mut record = Self::new(ErrorKind::Syntax, err.message);
        record.locations = err.locations;
        record
    }

    /// Failure of the resolver at `location`.
    pub fn from_resolver_error(err: ResolverError, location: &FieldLocation) -> Self {
        let mut record = Self::new(err.kind(), err.to_string());
        record.detail = err.detail();
        record.path = location.path.clone();
        record.locations = location.pos.into_iter().collect();
        record
    }

    /// Classifies an error reported by the executor.
    ///
    /// Errors raised through [`ResolverError`] keep their own kind. Errors
    /// without a path were produced before any resolver ran, which only
    /// happens during validation.
    pub fn from_server_error(err: ServerError) -> Self {
        let mut extensions = err
            .extensions
            .as_ref()
            .and_then(|ext| serde_json::to_value(ext).ok())
            .and_then(|value| match value {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default();

        let source = err.source::<ResolverError>();
        let kind = match source {
            Some(resolver_err) => resolver_err.kind(),
            None if extensions.get("code").and_then(|c| c.as_str()) == Some(BAD_USER_INPUT) => {
                ErrorKind::BadUserInput
            }
            None if err.path.is_empty() => ErrorKind::Validation,
            None => ErrorKind::DataFetching,
        };
        let detail = match source {
            Some(resolver_err) => resolver_err.detail(),
            None => err.message.clone(),
        };

        extensions
            .entry("code")
            .or_insert_with(|| kind.code().into());

        Self {
            message: err.message,
            kind,
            detail,
            locations: err.locations,
            path: err.path,
            extensions,
        }
    }

    /// Generic stand-in for an internal error. Keeps path and locations so the
    /// caller can tell which field failed.
    pub fn redacted(&self) -> Self {
        let mut extensions = serde_json::Map::new();
        extensions.insert("code".to_string(), INTERNAL_SERVER_EXCEPTION.into());
        Self {
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            kind: self.kind,
            detail: String::new(),
            locations: self.locations.clone(),
            path: self.path.clone(),
            extensions,
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.extensions.get("code").and_then(|c| c.as_str())
    }

    pub(crate) fn is_already_recorded(&self) -> bool {
        self.extensions.contains_key(RECORDED_EXTENSION)
    }
}

/// Failure of a single field resolver.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("{0}")]
    BadUserInput(String),

    #[error("catalog lookup failed: {0}")]
    Repo(#[from] RepoError),

    #[error("resolver panicked: {message}")]
    Panicked { message: String, trace: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ResolverError {
    pub fn bad_input(msg: impl Into<String>) -> Self {
        ResolverError::BadUserInput(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolverError::BadUserInput(_) => ErrorKind::BadUserInput,
            _ => ErrorKind::DataFetching,
        }
    }

    pub(crate) fn panicked(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        ResolverError::Panicked {
            message,
            trace: Backtrace::force_capture().to_string(),
        }
    }

    /// Full description for the server log: the error chain and a stack trace
    /// for internal failures.
    pub fn detail(&self) -> String {
        match self {
            ResolverError::BadUserInput(msg) => msg.clone(),
            ResolverError::Repo(err) => {
                format!("{self}: {err:?}\n{}", Backtrace::force_capture())
            }
            ResolverError::Panicked { message, trace } => {
                format!("resolver panicked: {message}\n{trace}")
            }
            // anyhow prints its own backtrace when one was captured.
            ResolverError::Internal(err) => match err.backtrace().status() {
                BacktraceStatus::Captured => format!("{err:?}"),
                _ => format!("{err:?}\n{}", Backtrace::force_capture()),
            },
        }
    }

    /// Converts into the executor's error type, keeping `self` as the source
    /// so the kind survives until classification.
    pub(crate) fn into_graphql_error(self) -> async_graphql::Error {
        let code = self.kind().code();
        async_graphql::Error::new_with_source(self).extend_with(|_, e| e.set("code", code))
    }
}

/// Extension trait turning any `Result<T, E: Display>` into a user-input
/// failure with a contextual prefix.
///
/// Usage: `raw.parse::<i64>().bad_input("ID")?`
pub trait ResultExt<T> {
    fn bad_input(self, context: &str) -> std::result::Result<T, ResolverError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn bad_input(self, context: &str) -> std::result::Result<T, ResolverError> {
        self.map_err(|e| ResolverError::bad_input(format!("{context}: {e}")))
    }
}
