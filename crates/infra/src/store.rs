//! The storage seam for the product catalog.

use async_trait::async_trait;
use thiserror::Error;

use storefront_core::{DomainError, ProductId, TagId};
use storefront_products::{NewProduct, ProductDetail, ProductPatch};

/// Failure of a store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input was rejected before touching storage (validation, bad id,
    /// missing required field).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The addressed product does not exist.
    #[error("product not found")]
    NotFound,

    /// The underlying query or constraint failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// CRUD plus tag reconciliation over the product tables.
///
/// `update` is a two-phase operation (scalar patch, then fetch-and-reconcile
/// tag associations) and implementations must apply both phases atomically:
/// a failure partway through must leave the previous state intact.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, ordered by product name descending, each with its
    /// category name and associated tag ids.
    async fn list(&self) -> Result<Vec<ProductDetail>, StoreError>;

    async fn get(&self, id: ProductId) -> Result<Option<ProductDetail>, StoreError>;

    /// Insert the product, then bulk-insert one association row per tag id.
    /// Duplicate tag ids in the input are collapsed.
    async fn create(
        &self,
        new: NewProduct,
        tag_ids: &[TagId],
    ) -> Result<ProductDetail, StoreError>;

    /// Patch scalar fields, then reconcile associations against `desired`.
    /// `desired = None` (field absent from the request) is rejected rather
    /// than treated as "remove all tags".
    async fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
        desired: Option<&[TagId]>,
    ) -> Result<ProductDetail, StoreError>;

    /// Delete strictly by id. Association rows go with the product.
    async fn delete(&self, id: ProductId) -> Result<(), StoreError>;
}
