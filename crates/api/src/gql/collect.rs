//! Per-request collection of resolver failures.
//!
//! The executor drops a failed field from its parent and forgets where it
//! was. Failures are therefore recorded here, with the field's path, and the
//! field itself resolves to null.

use std::sync::Arc;

use async_graphql::{ErrorExtensions, PathSegment, Pos, QueryPathNode, QueryPathSegment};
use parking_lot::Mutex;

use super::error::{ErrorRecord, ResolverError, RECORDED_EXTENSION};

/// Where a field sits in the response, captured before its resolver runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldLocation {
    pub path: Vec<PathSegment>,
    pub pos: Option<Pos>,
}

impl FieldLocation {
    pub fn new(node: Option<&QueryPathNode<'_>>, pos: Pos) -> Self {
        let mut path = Vec::new();
        let mut current = node;
        while let Some(node) = current {
            path.push(match node.segment {
                QueryPathSegment::Index(idx) => PathSegment::Index(idx),
                QueryPathSegment::Name(name) => PathSegment::Field(name.to_string()),
            });
            current = node.parent;
        }
        path.reverse();

        Self {
            path,
            pos: Some(pos),
        }
    }
}

/// Errors raised by resolvers during one execution. Attached to the request
/// as data; clones share the same list.
#[derive(Clone, Default)]
pub struct FieldErrors {
    inner: Arc<Mutex<Vec<ErrorRecord>>>,
}

impl FieldErrors {
    pub fn record(&self, location: &FieldLocation, err: ResolverError) {
        let record = ErrorRecord::from_resolver_error(err, location);
        self.inner.lock().push(record);
    }

    pub fn take(&self) -> Vec<ErrorRecord> {
        std::mem::take(&mut *self.inner.lock())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How a failing field reports its error.
pub struct FailureReport {
    errors: Option<FieldErrors>,
    location: FieldLocation,
    nullable: bool,
}

impl FailureReport {
    pub fn new(errors: Option<FieldErrors>, location: FieldLocation, nullable: bool) -> Self {
        Self {
            errors,
            location,
            nullable,
        }
    }

    /// `Ok` means the field resolves to null. A non-null field still fails in
    /// the executor so its parent is nulled, with a marker telling the engine
    /// the error is already recorded.
    pub(crate) fn fail(self, err: ResolverError) -> async_graphql::Result<()> {
        let Some(errors) = self.errors else {
            return Err(err.into_graphql_error());
        };
        errors.record(&self.location, err);
        if self.nullable {
            Ok(())
        } else {
            Err(async_graphql::Error::new("non-null field failed")
                .extend_with(|_, e| e.set(RECORDED_EXTENSION, true)))
        }
    }
}
