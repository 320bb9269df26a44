use std::future::Future;

use thiserror::Error;

use crate::models::{ProductDetailRow, ProductInstanceRow, ProductRow};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("upstream catalog unavailable: {0}")]
    Unavailable(String),
}

pub type RepoResult<T> = std::result::Result<T, RepoError>;

/// Source of catalog records. Resolvers only talk to the catalog through this
/// trait, so a real backend replaces [`SampleCatalog`](super::SampleCatalog)
/// without touching the schema wiring.
pub trait CatalogRepo: Send + Sync + 'static {
    fn product_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = RepoResult<Option<ProductRow>>> + Send;

    fn product_details(
        &self,
        product_id: i64,
    ) -> impl Future<Output = RepoResult<Vec<ProductDetailRow>>> + Send;

    /// Instance of a product, looked up by the subscription request id.
    fn product_instance(
        &self,
        request_id: i64,
    ) -> impl Future<Output = RepoResult<Option<ProductInstanceRow>>> + Send;

    fn related_products(
        &self,
        product_id: i64,
    ) -> impl Future<Output = RepoResult<Vec<ProductRow>>> + Send;
}
