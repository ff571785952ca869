use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use storefront_core::ProductId;
use storefront_infra::ProductStore;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn parse_product_id(id: &str) -> Result<ProductId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
    })
}

pub async fn list_products(
    Extension(store): Extension<Arc<dyn ProductStore>>,
) -> axum::response::Response {
    match store.list().await {
        Ok(items) => {
            let items: Vec<serde_json::Value> =
                items.into_iter().map(dto::product_detail_to_json).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::read_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match store.get(id).await {
        Ok(Some(detail)) => {
            (StatusCode::OK, Json(dto::product_detail_to_json(detail))).into_response()
        }
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "no product found with this id",
        ),
        Err(e) => errors::read_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let (new, tag_ids) = body.into_parts();
    let Some(tag_ids) = tag_ids else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_input", "tagIds is required");
    };

    match store.create(new, &tag_ids).await {
        Ok(detail) => {
            (StatusCode::OK, Json(dto::product_detail_to_json(detail))).into_response()
        }
        Err(e) => errors::write_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProductRequest>,
) -> axum::response::Response {
    let id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // The desired tag set stays Option-al here: the store rejects an absent
    // set after patch validation, inside the same transaction boundary.
    let (patch, tag_ids) = body.into_parts();

    match store.update(id, patch, tag_ids.as_deref()).await {
        Ok(detail) => {
            (StatusCode::OK, Json(dto::product_detail_to_json(detail))).into_response()
        }
        Err(e) => errors::write_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    // Deletes strictly by id; any request body is ignored.
    match store.delete(id).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "deleted": id }))).into_response(),
        Err(e) => errors::read_error_to_response(e),
    }
}
