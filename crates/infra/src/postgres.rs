//! Postgres-backed product store.
//!
//! Uses runtime queries (`sqlx::query` + `Row::try_get`) against the schema
//! in `migrations/0001_init.sql`. The update path composes the scalar patch
//! and the association reconciliation in a single transaction so a failure
//! partway rolls everything back.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use storefront_core::{AssociationId, CategoryId, ProductId, TagId};
use storefront_products::{
    NewProduct, Product, ProductDetail, ProductPatch, TagAssociation, reconcile,
};

use crate::store::{ProductStore, StoreError};

pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn product_row(row: &PgRow) -> Result<(Product, Option<String>), sqlx::Error> {
    let product = Product {
        id: ProductId::new(row.try_get::<i64, _>("id")?),
        product_name: row.try_get("product_name")?,
        price_cents: row.try_get("price_cents")?,
        stock: row.try_get("stock")?,
        category_id: row
            .try_get::<Option<i64>, _>("category_id")?
            .map(CategoryId::new),
    };
    let category_name = row.try_get::<Option<String>, _>("category_name")?;
    Ok((product, category_name))
}

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.product_name, p.price_cents, p.stock, p.category_id,
           c.category_name
    FROM product p
    LEFT JOIN category c ON c.id = p.category_id
"#;

impl PgProductStore {
    async fn fetch_detail(&self, id: ProductId) -> Result<Option<ProductDetail>, StoreError> {
        let row = sqlx::query(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let (product, category_name) = product_row(&row)?;

        let tag_ids: Vec<TagId> = sqlx::query(
            "SELECT tag_id FROM product_tag WHERE product_id = $1 ORDER BY tag_id",
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|r| r.try_get::<i64, _>("tag_id").map(TagId::new))
        .collect::<Result<_, _>>()?;

        Ok(Some(ProductDetail {
            product,
            category_name,
            tag_ids,
        }))
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list(&self) -> Result<Vec<ProductDetail>, StoreError> {
        let rows = sqlx::query(&format!("{PRODUCT_SELECT} ORDER BY p.product_name DESC"))
            .fetch_all(&self.pool)
            .await?;

        let assoc_rows = sqlx::query(
            "SELECT product_id, tag_id FROM product_tag ORDER BY product_id, tag_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tags_by_product: HashMap<i64, Vec<TagId>> = HashMap::new();
        for row in assoc_rows {
            let product_id: i64 = row.try_get("product_id")?;
            let tag_id: i64 = row.try_get("tag_id")?;
            tags_by_product
                .entry(product_id)
                .or_default()
                .push(TagId::new(tag_id));
        }

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let (product, category_name) = product_row(&row)?;
            let tag_ids = tags_by_product
                .remove(&product.id.as_i64())
                .unwrap_or_default();
            out.push(ProductDetail {
                product,
                category_name,
                tag_ids,
            });
        }
        Ok(out)
    }

    async fn get(&self, id: ProductId) -> Result<Option<ProductDetail>, StoreError> {
        self.fetch_detail(id).await
    }

    async fn create(
        &self,
        new: NewProduct,
        tag_ids: &[TagId],
    ) -> Result<ProductDetail, StoreError> {
        new.validate()?;

        // Set semantics on the input: collapse duplicate tag ids instead of
        // tripping the unique (product_id, tag_id) index.
        let mut unique: Vec<i64> = tag_ids.iter().map(|t| t.as_i64()).collect();
        unique.sort_unstable();
        unique.dedup();

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO product (product_name, price_cents, stock, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&new.product_name)
        .bind(new.price_cents)
        .bind(new.stock)
        .bind(new.category_id.map(|c| c.as_i64()))
        .fetch_one(&mut *tx)
        .await?;
        let id = ProductId::new(row.try_get::<i64, _>("id")?);

        if !unique.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO product_tag (product_id, tag_id)
                SELECT $1, t FROM UNNEST($2::bigint[]) AS t
                "#,
            )
            .bind(id.as_i64())
            .bind(&unique)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(product_id = id.as_i64(), "product created");
        self.fetch_detail(id).await?.ok_or(StoreError::NotFound)
    }

    async fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
        desired: Option<&[TagId]>,
    ) -> Result<ProductDetail, StoreError> {
        patch.validate()?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE product
            SET product_name = COALESCE($2, product_name),
                price_cents  = COALESCE($3, price_cents),
                stock        = COALESCE($4, stock),
                category_id  = COALESCE($5, category_id),
                updated_at   = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(patch.product_name.as_deref())
        .bind(patch.price_cents)
        .bind(patch.stock)
        .bind(patch.category_id.map(|c| c.as_i64()))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        let current: Vec<TagAssociation> = sqlx::query(
            "SELECT id, product_id, tag_id FROM product_tag WHERE product_id = $1 ORDER BY id",
        )
        .bind(id.as_i64())
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|r| -> Result<TagAssociation, sqlx::Error> {
            Ok(TagAssociation {
                id: AssociationId::new(r.try_get::<i64, _>("id")?),
                product_id: ProductId::new(r.try_get::<i64, _>("product_id")?),
                tag_id: TagId::new(r.try_get::<i64, _>("tag_id")?),
            })
        })
        .collect::<Result<_, _>>()?;

        let plan = reconcile(id, desired, &current)?;

        if !plan.to_delete.is_empty() {
            let ids: Vec<i64> = plan.to_delete.iter().map(|a| a.as_i64()).collect();
            sqlx::query("DELETE FROM product_tag WHERE id = ANY($1)")
                .bind(&ids)
                .execute(&mut *tx)
                .await?;
        }

        if !plan.to_insert.is_empty() {
            let tag_ids: Vec<i64> = plan.to_insert.iter().map(|n| n.tag_id.as_i64()).collect();
            sqlx::query(
                r#"
                INSERT INTO product_tag (product_id, tag_id)
                SELECT $1, t FROM UNNEST($2::bigint[]) AS t
                "#,
            )
            .bind(id.as_i64())
            .bind(&tag_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            product_id = id.as_i64(),
            deleted = plan.to_delete.len(),
            inserted = plan.to_insert.len(),
            "product updated"
        );
        self.fetch_detail(id).await?.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        // Association rows are removed by ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        tracing::info!(product_id = id.as_i64(), "product deleted");
        Ok(())
    }
}
