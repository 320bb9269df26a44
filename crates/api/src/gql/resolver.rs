//! The contract between the executor and field resolvers.
//!
//! A resolver is a plain function from [`FieldInput`] to [`Completion`]. It is
//! bound to a `(type, field)` pair in a [`ResolverRegistry`], which is built
//! once at startup and handed to the schema builder.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use async_graphql::{SelectionField, Value};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use super::collect::FailureReport;
use super::error::{ResolverError, ResultExt};

pub type ResolverResult<T> = std::result::Result<T, ResolverError>;

pub type Resolver = Arc<dyn Fn(FieldInput) -> Completion + Send + Sync>;

/// Fields the caller requested under one object, in selection order.
/// Fragment spreads and inline fragments are already flattened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    fields: Vec<(String, SelectionSet)>,
}

impl SelectionSet {
    pub fn from_field(field: SelectionField<'_>) -> Self {
        Self {
            fields: field
                .selection_set()
                .map(|child| (child.name().to_string(), Self::from_field(child)))
                .collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| field == name)
    }

    /// Sub-selection of `name`, if it was requested.
    pub fn field(&self, name: &str) -> Option<&SelectionSet> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, selection)| selection)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|name| (name.into(), SelectionSet::default()))
                .collect(),
        }
    }
}

/// Field arguments after variable substitution and default values.
#[derive(Debug, Clone, Default)]
pub struct Arguments(BTreeMap<String, Value>);

impl Arguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !matches!(v, Value::Null))
    }

    /// Reads an identifier argument. Identifiers travel as decimal text, but
    /// integer literals are accepted as well.
    pub fn id(&self, name: &str) -> ResolverResult<i64> {
        let label = name.to_uppercase();
        match self.get(name) {
            None => Err(ResolverError::bad_input(format!("{label}: Required field."))),
            Some(Value::String(raw)) if raw.trim().is_empty() => {
                Err(ResolverError::bad_input(format!("{label}: Required field.")))
            }
            Some(Value::String(raw)) => raw.trim().parse::<i64>().bad_input(&label),
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| ResolverError::bad_input(format!("{label}: not an integer"))),
            Some(_) => Err(ResolverError::bad_input(format!(
                "{label}: expected decimal digits"
            ))),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Everything a resolver gets to see about the field it resolves.
#[derive(Debug, Clone, Default)]
pub struct FieldInput {
    /// Resolved value of the enclosing object, `Null` on the root type.
    pub parent: Value,
    pub arguments: Arguments,
    pub selection: SelectionSet,
}

impl FieldInput {
    pub fn from_context(ctx: &ResolverContext<'_>) -> Self {
        Self {
            parent: ctx.parent_value.as_value().cloned().unwrap_or(Value::Null),
            arguments: ctx
                .args
                .iter()
                .map(|(name, value)| (name.to_string(), value.as_value().clone()))
                .collect(),
            selection: SelectionSet::from_field(ctx.ctx.field()),
        }
    }

    /// Property of the parent object, `None` when absent or null.
    pub fn parent_field(&self, name: &str) -> Option<&Value> {
        match &self.parent {
            Value::Object(map) => map.get(name).filter(|v| !matches!(v, Value::Null)),
            _ => None,
        }
    }

    pub fn parent_id(&self) -> ResolverResult<i64> {
        match self.parent_field("id") {
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| anyhow::anyhow!("parent id {n} is not an integer").into()),
            other => Err(anyhow::anyhow!("parent object has no usable id: {other:?}").into()),
        }
    }
}

/// Outcome of invoking a resolver: either already available or still running.
pub enum Completion {
    Ready(ResolverResult<Value>),
    Pending(BoxFuture<'static, ResolverResult<Value>>),
}

impl Completion {
    pub fn ready(value: impl Into<Value>) -> Self {
        Completion::Ready(Ok(value.into()))
    }

    pub fn fail(err: impl Into<ResolverError>) -> Self {
        Completion::Ready(Err(err.into()))
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = ResolverResult<Value>> + Send + 'static,
    {
        Completion::Pending(future.boxed())
    }

    /// Runs `resolver` on `input`, turning a panic during the call into a
    /// failed completion.
    pub fn invoke(resolver: &Resolver, input: FieldInput) -> Self {
        std::panic::catch_unwind(AssertUnwindSafe(|| resolver(input)))
            .unwrap_or_else(|payload| Completion::Ready(Err(ResolverError::panicked(payload))))
    }

    /// Both variants go through this one adapter. Failures and panics are
    /// handed to `report`; they never escape the field.
    pub fn into_field_future<'a>(self, report: FailureReport) -> FieldFuture<'a> {
        match self {
            Completion::Ready(Ok(value)) => FieldFuture::Value(into_field_value(value)),
            Completion::Ready(Err(err)) => match report.fail(err) {
                Ok(()) => FieldFuture::Value(None),
                Err(err) => FieldFuture::new(async move { Err::<Option<Value>, _>(err) }),
            },
            Completion::Pending(future) => FieldFuture::new(async move {
                let result = AssertUnwindSafe(future)
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| Err(ResolverError::panicked(payload)));
                match result {
                    Ok(value) => Ok(into_field_value(value)),
                    Err(err) => report.fail(err).map(|()| None),
                }
            }),
        }
    }
}

/// Lists are unpacked element by element so nested objects become parents of
/// their own fields.
pub(crate) fn into_field_value<'a>(value: Value) -> Option<FieldValue<'a>> {
    match value {
        Value::Null => None,
        Value::List(items) => Some(FieldValue::list(items.into_iter().map(|item| {
            into_field_value(item).unwrap_or_else(|| FieldValue::value(Value::Null))
        }))),
        other => Some(FieldValue::value(other)),
    }
}

/// Resolver bindings keyed by `(type name, field name)`.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    bindings: HashMap<(String, String), Resolver>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind<F>(mut self, type_name: &str, field: &str, resolver: F) -> Self
    where
        F: Fn(FieldInput) -> Completion + Send + Sync + 'static,
    {
        self.bindings
            .insert((type_name.to_string(), field.to_string()), Arc::new(resolver));
        self
    }

    pub fn get(&self, type_name: &str, field: &str) -> Option<&Resolver> {
        self.bindings
            .get(&(type_name.to_string(), field.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .keys()
            .map(|(type_name, field)| (type_name.as_str(), field.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
