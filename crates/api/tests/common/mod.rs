use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use api::gql::{self, build_registry, build_schema, ExecutableSchema, QueryDocument, SchemaOptions};
use async_graphql::Variables;
use infra::models::{ProductDetailRow, ProductInstanceRow, ProductRow};
use infra::repos::{CatalogRepo, RepoError, RepoResult, SampleCatalog};

pub const SCHEMA_SDL: &str = include_str!("../../schema.graphqls");

/// Schema wired to the sample catalog, as the binary runs it.
#[allow(dead_code)]
pub fn sample_schema() -> ExecutableSchema {
    schema_with(Arc::new(SampleCatalog::new()))
}

#[allow(dead_code)]
pub fn schema_with<R: CatalogRepo>(repo: Arc<R>) -> ExecutableSchema {
    build_schema(SCHEMA_SDL, &build_registry(repo), &SchemaOptions::default())
        .expect("Failed to build schema")
}

/// Runs the whole pipeline and returns the response body as JSON.
#[allow(dead_code)]
pub async fn execute_graphql(
    schema: &ExecutableSchema,
    query: &str,
    variables: Option<serde_json::Value>,
) -> serde_json::Value {
    let document = QueryDocument {
        query: query.to_string(),
        operation_name: None,
        variables: variables.map(Variables::from_json).unwrap_or_default(),
    };
    let payload = gql::run(schema, document)
        .await
        .expect("Failed to assemble response");
    serde_json::to_value(payload).expect("Failed to serialize response")
}

/// Sample catalog that counts detail lookups.
#[allow(dead_code)]
#[derive(Default)]
pub struct CountingCatalog {
    inner: SampleCatalog,
    detail_calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingCatalog {
    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

impl CatalogRepo for CountingCatalog {
    fn product_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = RepoResult<Option<ProductRow>>> + Send {
        self.inner.product_by_id(id)
    }

    fn product_details(
        &self,
        product_id: i64,
    ) -> impl Future<Output = RepoResult<Vec<ProductDetailRow>>> + Send {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.product_details(product_id)
    }

    fn product_instance(
        &self,
        request_id: i64,
    ) -> impl Future<Output = RepoResult<Option<ProductInstanceRow>>> + Send {
        self.inner.product_instance(request_id)
    }

    fn related_products(
        &self,
        product_id: i64,
    ) -> impl Future<Output = RepoResult<Vec<ProductRow>>> + Send {
        self.inner.related_products(product_id)
    }
}

/// Catalog whose product lookup always fails; everything else is sample data.
#[allow(dead_code)]
pub struct FailingCatalog {
    message: String,
    inner: SampleCatalog,
}

#[allow(dead_code)]
impl FailingCatalog {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            inner: SampleCatalog::new(),
        }
    }
}

impl CatalogRepo for FailingCatalog {
    fn product_by_id(
        &self,
        _id: i64,
    ) -> impl Future<Output = RepoResult<Option<ProductRow>>> + Send {
        let message = self.message.clone();
        async move { Err(RepoError::Unavailable(message)) }
    }

    fn product_details(
        &self,
        product_id: i64,
    ) -> impl Future<Output = RepoResult<Vec<ProductDetailRow>>> + Send {
        self.inner.product_details(product_id)
    }

    fn product_instance(
        &self,
        request_id: i64,
    ) -> impl Future<Output = RepoResult<Option<ProductInstanceRow>>> + Send {
        self.inner.product_instance(request_id)
    }

    fn related_products(
        &self,
        product_id: i64,
    ) -> impl Future<Output = RepoResult<Vec<ProductRow>>> + Send {
        self.inner.related_products(product_id)
    }
}
