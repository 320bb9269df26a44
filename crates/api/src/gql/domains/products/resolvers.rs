use std::sync::Arc;

use async_graphql::Value;
use infra::repos::CatalogRepo;

use crate::gql::common::helpers::to_value;
use crate::gql::resolver::{Completion, FieldInput, ResolverRegistry};

/// Binds the product resolvers, all backed by `repo`.
pub fn register<R: CatalogRepo>(registry: ResolverRegistry, repo: Arc<R>) -> ResolverRegistry {
    registry
        .bind("Query", "productById", product_by_id(repo.clone()))
        .bind("Product", "details", product_details(repo.clone()))
        .bind("Product", "instance", product_instance(repo.clone()))
        .bind("Product", "related", related_products(repo))
}

/// `Query.productById(id)`. Details are loaded up front, but only when the
/// caller selected them.
fn product_by_id<R: CatalogRepo>(
    repo: Arc<R>,
) -> impl Fn(FieldInput) -> Completion + Send + Sync + 'static {
    move |input| {
        let id = match input.arguments.id("id") {
            Ok(id) => id,
            Err(err) => return Completion::fail(err),
        };
        let with_details = input.selection.contains("details");
        let repo = repo.clone();

        Completion::pending(async move {
            let Some(mut product) = repo.product_by_id(id).await? else {
                return Ok(Value::Null);
            };
            if with_details {
                product.details = Some(repo.product_details(id).await?);
            }
            to_value(&product)
        })
    }
}

/// `Product.details`. Reuses details already attached to the parent.
fn product_details<R: CatalogRepo>(
    repo: Arc<R>,
) -> impl Fn(FieldInput) -> Completion + Send + Sync + 'static {
    move |input| {
        if let Some(details) = input.parent_field("details") {
            return Completion::ready(details.clone());
        }
        let product_id = match input.parent_id() {
            Ok(id) => id,
            Err(err) => return Completion::fail(err),
        };
        let repo = repo.clone();

        Completion::pending(async move {
            let details = repo.product_details(product_id).await?;
            to_value(&details)
        })
    }
}

/// `Product.instance(id)`, where `id` is the subscription request id.
fn product_instance<R: CatalogRepo>(
    repo: Arc<R>,
) -> impl Fn(FieldInput) -> Completion + Send + Sync + 'static {
    move |input| {
        let request_id = match input.arguments.id("id") {
            Ok(id) => id,
            Err(err) => return Completion::fail(err),
        };
        let repo = repo.clone();

        Completion::pending(async move {
            match repo.product_instance(request_id).await? {
                Some(instance) => to_value(&instance),
                None => Ok(Value::Null),
            }
        })
    }
}

fn related_products<R: CatalogRepo>(
    repo: Arc<R>,
) -> impl Fn(FieldInput) -> Completion + Send + Sync + 'static {
    move |input| {
        let product_id = match input.parent_id() {
            Ok(id) => id,
            Err(err) => return Completion::fail(err),
        };
        let repo = repo.clone();

        Completion::pending(async move {
            let related = repo.related_products(product_id).await?;
            to_value(&related)
        })
    }
}
