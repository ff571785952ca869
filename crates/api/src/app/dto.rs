use serde::Deserialize;

use storefront_core::{CategoryId, TagId};
use storefront_products::{NewProduct, ProductDetail, ProductPatch};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub product_name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: i64,
    pub stock: i64,
    pub category_id: Option<CategoryId>,
    /// Required. Absent `tagIds` is rejected rather than treated as "no tags".
    #[serde(rename = "tagIds")]
    pub tag_ids: Option<Vec<TagId>>,
}

impl CreateProductRequest {
    pub fn into_parts(self) -> (NewProduct, Option<Vec<TagId>>) {
        (
            NewProduct {
                product_name: self.product_name,
                price_cents: self.price,
                stock: self.stock,
                category_id: self.category_id,
            },
            self.tag_ids,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub product_name: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i64>,
    pub category_id: Option<CategoryId>,
    /// Required. A malformed request must not silently strip all tags.
    #[serde(rename = "tagIds")]
    pub tag_ids: Option<Vec<TagId>>,
}

impl UpdateProductRequest {
    pub fn into_parts(self) -> (ProductPatch, Option<Vec<TagId>>) {
        (
            ProductPatch {
                product_name: self.product_name,
                price_cents: self.price,
                stock: self.stock,
                category_id: self.category_id,
            },
            self.tag_ids,
        )
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_detail_to_json(detail: ProductDetail) -> serde_json::Value {
    serde_json::json!({
        "id": detail.product.id,
        "product_name": detail.product.product_name,
        "price": detail.product.price_cents,
        "stock": detail.product.stock,
        "category_id": detail.product.category_id,
        "category_name": detail.category_name,
        "tag_ids": detail.tag_ids,
    })
}
