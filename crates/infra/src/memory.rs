//! In-memory product store (dev/test).
//!
//! Mirrors the Postgres adapter's semantics over plain maps, and goes through
//! the same `reconcile` function on update. Mutations take the state lock for
//! their whole duration, which gives the update path the same all-or-nothing
//! behavior the Postgres transaction provides.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use storefront_core::{AssociationId, CategoryId, DomainError, ProductId, TagId};
use storefront_products::{
    Category, NewProduct, Product, ProductDetail, ProductPatch, Tag, TagAssociation, reconcile,
};

use crate::store::{ProductStore, StoreError};

#[derive(Default)]
struct State {
    products: BTreeMap<i64, Product>,
    categories: BTreeMap<i64, Category>,
    tags: BTreeMap<i64, Tag>,
    associations: BTreeMap<i64, TagAssociation>,
    next_product_id: i64,
    next_category_id: i64,
    next_tag_id: i64,
    next_association_id: i64,
}

impl State {
    fn detail(&self, product: &Product) -> ProductDetail {
        let category_name = product
            .category_id
            .and_then(|c| self.categories.get(&c.as_i64()))
            .map(|c| c.category_name.clone());
        let mut tag_ids: Vec<TagId> = self
            .associations
            .values()
            .filter(|a| a.product_id == product.id)
            .map(|a| a.tag_id)
            .collect();
        tag_ids.sort_unstable();
        ProductDetail {
            product: product.clone(),
            category_name,
            tag_ids,
        }
    }

    fn current_associations(&self, product_id: ProductId) -> Vec<TagAssociation> {
        self.associations
            .values()
            .filter(|a| a.product_id == product_id)
            .copied()
            .collect()
    }

    fn ensure_tags_exist(&self, tag_ids: &[TagId]) -> Result<(), StoreError> {
        for tag_id in tag_ids {
            if !self.tags.contains_key(&tag_id.as_i64()) {
                return Err(DomainError::validation(format!("unknown tag id: {tag_id}")).into());
            }
        }
        Ok(())
    }

    fn ensure_category_exists(&self, category_id: Option<CategoryId>) -> Result<(), StoreError> {
        if let Some(c) = category_id
            && !self.categories.contains_key(&c.as_i64())
        {
            return Err(DomainError::validation(format!("unknown category id: {c}")).into());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProductStore {
    inner: Mutex<State>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category (tags and categories have no write endpoints; tests
    /// and dev setups insert them directly).
    pub fn insert_category(&self, category_name: impl Into<String>) -> CategoryId {
        let mut state = self.inner.lock().unwrap();
        state.next_category_id += 1;
        let id = CategoryId::new(state.next_category_id);
        state.categories.insert(
            id.as_i64(),
            Category {
                id,
                category_name: category_name.into(),
            },
        );
        id
    }

    /// Seed a tag.
    pub fn insert_tag(&self, tag_name: impl Into<String>) -> TagId {
        let mut state = self.inner.lock().unwrap();
        state.next_tag_id += 1;
        let id = TagId::new(state.next_tag_id);
        state.tags.insert(
            id.as_i64(),
            Tag {
                id,
                tag_name: tag_name.into(),
            },
        );
        id
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self) -> Result<Vec<ProductDetail>, StoreError> {
        let state = self.inner.lock().unwrap();
        let mut details: Vec<ProductDetail> =
            state.products.values().map(|p| state.detail(p)).collect();
        details.sort_by(|a, b| b.product.product_name.cmp(&a.product.product_name));
        Ok(details)
    }

    async fn get(&self, id: ProductId) -> Result<Option<ProductDetail>, StoreError> {
        let state = self.inner.lock().unwrap();
        Ok(state.products.get(&id.as_i64()).map(|p| state.detail(p)))
    }

    async fn create(
        &self,
        new: NewProduct,
        tag_ids: &[TagId],
    ) -> Result<ProductDetail, StoreError> {
        new.validate()?;

        let mut unique: Vec<TagId> = tag_ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let mut state = self.inner.lock().unwrap();
        state.ensure_category_exists(new.category_id)?;
        state.ensure_tags_exist(&unique)?;

        state.next_product_id += 1;
        let id = ProductId::new(state.next_product_id);
        let product = Product {
            id,
            product_name: new.product_name,
            price_cents: new.price_cents,
            stock: new.stock,
            category_id: new.category_id,
        };
        state.products.insert(id.as_i64(), product.clone());

        for tag_id in unique {
            state.next_association_id += 1;
            let assoc_id = AssociationId::new(state.next_association_id);
            state.associations.insert(
                assoc_id.as_i64(),
                TagAssociation {
                    id: assoc_id,
                    product_id: id,
                    tag_id,
                },
            );
        }

        Ok(state.detail(&product))
    }

    async fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
        desired: Option<&[TagId]>,
    ) -> Result<ProductDetail, StoreError> {
        patch.validate()?;

        let mut state = self.inner.lock().unwrap();
        if !state.products.contains_key(&id.as_i64()) {
            return Err(StoreError::NotFound);
        }
        state.ensure_category_exists(patch.category_id)?;

        // Compute the full delta before mutating anything, so a rejected
        // input leaves the state untouched.
        let current = state.current_associations(id);
        let plan = reconcile(id, desired, &current)?;
        let insert_tags: Vec<TagId> = plan.to_insert.iter().map(|n| n.tag_id).collect();
        state.ensure_tags_exist(&insert_tags)?;

        let product = state
            .products
            .get_mut(&id.as_i64())
            .expect("presence checked above");
        product.apply_patch(&patch);
        let product = product.clone();

        for assoc_id in &plan.to_delete {
            state.associations.remove(&assoc_id.as_i64());
        }
        for new_assoc in &plan.to_insert {
            state.next_association_id += 1;
            let assoc_id = AssociationId::new(state.next_association_id);
            state.associations.insert(
                assoc_id.as_i64(),
                TagAssociation {
                    id: assoc_id,
                    product_id: new_assoc.product_id,
                    tag_id: new_assoc.tag_id,
                },
            );
        }

        Ok(state.detail(&product))
    }

    async fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        let mut state = self.inner.lock().unwrap();
        if state.products.remove(&id.as_i64()).is_none() {
            return Err(StoreError::NotFound);
        }
        state.associations.retain(|_, a| a.product_id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_tags(n: i64) -> (InMemoryProductStore, Vec<TagId>) {
        let store = InMemoryProductStore::new();
        let tags = (0..n)
            .map(|i| store.insert_tag(format!("tag-{i}")))
            .collect();
        (store, tags)
    }

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            product_name: name.to_string(),
            price_cents: 1_000,
            stock: 5,
            category_id: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips_tags() {
        let (store, tags) = store_with_tags(3);
        let created = store
            .create(new_product("Basketball"), &[tags[0], tags[2]])
            .await
            .unwrap();

        let fetched = store.get(created.product.id).await.unwrap().unwrap();
        assert_eq!(fetched.tag_ids, vec![tags[0], tags[2]]);
        assert_eq!(fetched.product.product_name, "Basketball");
    }

    #[tokio::test]
    async fn create_collapses_duplicate_tag_ids() {
        let (store, tags) = store_with_tags(1);
        let created = store
            .create(new_product("Cap"), &[tags[0], tags[0], tags[0]])
            .await
            .unwrap();
        assert_eq!(created.tag_ids, vec![tags[0]]);
    }

    #[tokio::test]
    async fn create_rejects_unknown_tag() {
        let (store, _) = store_with_tags(1);
        let err = store
            .create(new_product("Cap"), &[TagId::new(99)])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn update_reconciles_associations() {
        let (store, tags) = store_with_tags(4);
        let created = store
            .create(new_product("Shirt"), &[tags[0], tags[1]])
            .await
            .unwrap();

        let desired = vec![tags[1], tags[3]];
        let updated = store
            .update(created.product.id, ProductPatch::default(), Some(&desired))
            .await
            .unwrap();

        assert_eq!(updated.tag_ids, vec![tags[1], tags[3]]);
    }

    #[tokio::test]
    async fn update_without_desired_set_is_rejected_and_changes_nothing() {
        let (store, tags) = store_with_tags(2);
        let created = store
            .create(new_product("Shirt"), &[tags[0]])
            .await
            .unwrap();

        let patch = ProductPatch {
            product_name: Some("Jacket".to_string()),
            ..ProductPatch::default()
        };
        let err = store.update(created.product.id, patch, None).await.unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Validation(_))));

        // Neither the scalar patch nor the association set was applied.
        let fetched = store.get(created.product.id).await.unwrap().unwrap();
        assert_eq!(fetched.product.product_name, "Shirt");
        assert_eq!(fetched.tag_ids, vec![tags[0]]);
    }

    #[tokio::test]
    async fn update_with_unknown_tag_leaves_state_untouched() {
        let (store, tags) = store_with_tags(2);
        let created = store
            .create(new_product("Shirt"), &[tags[0]])
            .await
            .unwrap();

        let desired = vec![tags[0], TagId::new(42)];
        let err = store
            .update(created.product.id, ProductPatch::default(), Some(&desired))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(_)));

        let fetched = store.get(created.product.id).await.unwrap().unwrap();
        assert_eq!(fetched.tag_ids, vec![tags[0]]);
    }

    #[tokio::test]
    async fn update_missing_product_is_not_found() {
        let (store, tags) = store_with_tags(1);
        let desired = vec![tags[0]];
        let err = store
            .update(ProductId::new(7), ProductPatch::default(), Some(&desired))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn update_patches_scalars() {
        let (store, _) = store_with_tags(0);
        let created = store.create(new_product("Shirt"), &[]).await.unwrap();

        let patch = ProductPatch {
            price_cents: Some(2_500),
            stock: Some(9),
            ..ProductPatch::default()
        };
        let updated = store
            .update(created.product.id, patch, Some(&[]))
            .await
            .unwrap();
        assert_eq!(updated.product.price_cents, 2_500);
        assert_eq!(updated.product.stock, 9);
        assert_eq!(updated.product.product_name, "Shirt");
    }

    #[tokio::test]
    async fn delete_removes_product_and_associations() {
        let (store, tags) = store_with_tags(2);
        let created = store
            .create(new_product("Shirt"), &[tags[0], tags[1]])
            .await
            .unwrap();

        store.delete(created.product.id).await.unwrap();
        assert!(store.get(created.product.id).await.unwrap().is_none());

        // The associations are gone too: a new product starts clean.
        let fresh = store.create(new_product("Hat"), &[]).await.unwrap();
        assert!(fresh.tag_ids.is_empty());
    }

    #[tokio::test]
    async fn delete_missing_product_is_not_found() {
        let (store, _) = store_with_tags(0);
        let err = store.delete(ProductId::new(3)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn list_orders_by_name_descending() {
        let (store, _) = store_with_tags(0);
        store.create(new_product("Apple"), &[]).await.unwrap();
        store.create(new_product("Zebra"), &[]).await.unwrap();
        store.create(new_product("Mango"), &[]).await.unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.product.product_name)
            .collect();
        assert_eq!(names, vec!["Zebra", "Mango", "Apple"]);
    }

    #[tokio::test]
    async fn list_includes_category_name() {
        let store = InMemoryProductStore::new();
        let cat = store.insert_category("Sports");
        let mut new = new_product("Basketball");
        new.category_id = Some(cat);
        store.create(new, &[]).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed[0].category_name.as_deref(), Some("Sports"));
    }
}
