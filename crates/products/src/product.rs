use serde::{Deserialize, Serialize};

use storefront_core::{CategoryId, DomainError, DomainResult, ProductId, TagId};

/// A catalog product as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub product_name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price_cents: i64,
    pub stock: i64,
    pub category_id: Option<CategoryId>,
}

impl Product {
    /// Apply a partial update to the scalar fields. Fields absent from the
    /// patch are left untouched.
    pub fn apply_patch(&mut self, patch: &ProductPatch) {
        if let Some(name) = &patch.product_name {
            self.product_name = name.clone();
        }
        if let Some(price) = patch.price_cents {
            self.price_cents = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = Some(category_id);
        }
    }
}

/// Fields for a product to be created. The identifier is assigned by the
/// store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub product_name: String,
    pub price_cents: i64,
    pub stock: i64,
    pub category_id: Option<CategoryId>,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        if self.product_name.trim().is_empty() {
            return Err(DomainError::validation("product_name cannot be empty"));
        }
        if self.price_cents < 0 {
            return Err(DomainError::validation("price cannot be negative"));
        }
        if self.stock < 0 {
            return Err(DomainError::validation("stock cannot be negative"));
        }
        Ok(())
    }
}

/// Partial update of a product's scalar fields. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub product_name: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub category_id: Option<CategoryId>,
}

impl ProductPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.product_name
            && name.trim().is_empty()
        {
            return Err(DomainError::validation("product_name cannot be empty"));
        }
        if let Some(price) = self.price_cents
            && price < 0
        {
            return Err(DomainError::validation("price cannot be negative"));
        }
        if let Some(stock) = self.stock
            && stock < 0
        {
            return Err(DomainError::validation("stock cannot be negative"));
        }
        Ok(())
    }
}

/// Read shape returned by list/get: product scalars plus the nested category
/// name and the associated tag identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
    pub category_name: Option<String>,
    pub tag_ids: Vec<TagId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_new() -> NewProduct {
        NewProduct {
            product_name: "Basketball".to_string(),
            price_cents: 20_000,
            stock: 3,
            category_id: None,
        }
    }

    #[test]
    fn new_product_accepts_valid_fields() {
        assert!(valid_new().validate().is_ok());
    }

    #[test]
    fn new_product_rejects_blank_name() {
        let mut p = valid_new();
        p.product_name = "   ".to_string();
        let err = p.validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_product_rejects_negative_price() {
        let mut p = valid_new();
        p.price_cents = -1;
        assert!(p.validate().is_err());
    }

    #[test]
    fn new_product_rejects_negative_stock() {
        let mut p = valid_new();
        p.stock = -5;
        assert!(p.validate().is_err());
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut product = Product {
            id: ProductId::new(1),
            product_name: "Basketball".to_string(),
            price_cents: 20_000,
            stock: 3,
            category_id: None,
        };

        product.apply_patch(&ProductPatch {
            price_cents: Some(18_000),
            ..ProductPatch::default()
        });

        assert_eq!(product.product_name, "Basketball");
        assert_eq!(product.price_cents, 18_000);
        assert_eq!(product.stock, 3);
    }

    #[test]
    fn patch_rejects_negative_values() {
        let patch = ProductPatch {
            stock: Some(-1),
            ..ProductPatch::default()
        };
        assert!(patch.validate().is_err());

        let patch = ProductPatch {
            price_cents: Some(-100),
            ..ProductPatch::default()
        };
        assert!(patch.validate().is_err());
    }
}
