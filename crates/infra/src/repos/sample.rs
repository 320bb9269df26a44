use std::future::Future;

use crate::models::{ProductDetailRow, ProductInstanceRow, ProductRow};
use crate::repos::catalog::{CatalogRepo, RepoResult};

const SAMPLE_CATEGORY: &str = "The Category Name";
const SAMPLE_DESCRIPTION: &str = "Here is the product description.";

/// Catalog that answers every lookup with fixed sample records.
#[derive(Debug, Clone, Default)]
pub struct SampleCatalog;

impl SampleCatalog {
    pub fn new() -> Self {
        Self
    }

    fn product(id: i64) -> ProductRow {
        ProductRow {
            id,
            name: Some("ProductName".to_string()),
            category_name: Some(SAMPLE_CATEGORY.to_string()),
            description: Some(SAMPLE_DESCRIPTION.to_string()),
            ..Default::default()
        }
    }

    fn details(product_id: i64) -> Vec<ProductDetailRow> {
        vec![ProductDetailRow {
            id: product_id,
            description: Some("The product detailed description.".to_string()),
            display: Some("display".to_string()),
            image: Some("NA".to_string()),
            name: Some("product details".to_string()),
            card: true,
            ..Default::default()
        }]
    }
}

impl CatalogRepo for SampleCatalog {
    fn product_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = RepoResult<Option<ProductRow>>> + Send {
        async move {
            tracing::debug!(id, "loading sample product");
            Ok(Some(Self::product(id)))
        }
    }

    fn product_details(
        &self,
        product_id: i64,
    ) -> impl Future<Output = RepoResult<Vec<ProductDetailRow>>> + Send {
        async move { Ok(Self::details(product_id)) }
    }

    fn product_instance(
        &self,
        request_id: i64,
    ) -> impl Future<Output = RepoResult<Option<ProductInstanceRow>>> + Send {
        async move {
            Ok(Some(ProductInstanceRow {
                id: request_id,
                request_id: Some(request_id),
                name: Some("instanceName".to_string()),
                ..Default::default()
            }))
        }
    }

    fn related_products(
        &self,
        product_id: i64,
    ) -> impl Future<Output = RepoResult<Vec<ProductRow>>> + Send {
        async move {
            // Related offerings share the parent's id; they are not deduplicated.
            Ok(vec![ProductRow {
                id: product_id,
                category_name: Some(SAMPLE_CATEGORY.to_string()),
                description: Some(SAMPLE_DESCRIPTION.to_string()),
                ..Default::default()
            }])
        }
    }
}
