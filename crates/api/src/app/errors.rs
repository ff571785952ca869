use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use storefront_core::DomainError;
use storefront_infra::StoreError;

/// Map a store failure on a read path (GET/DELETE). Unexpected query
/// failures surface as 500s.
pub fn read_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(e) => domain_error_to_response(e),
        StoreError::NotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "no product found with this id")
        }
        StoreError::Database(e) => {
            tracing::error!(error = %e, "query failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "unexpected storage failure",
            )
        }
    }
}

/// Map a store failure on a write path (POST/PUT). Constraint and query
/// failures surface as 400s alongside validation errors.
pub fn write_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(e) => domain_error_to_response(e),
        StoreError::NotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "no product found with this id")
        }
        StoreError::Database(e) => {
            tracing::warn!(error = %e, "write rejected by storage");
            json_error(StatusCode::BAD_REQUEST, "storage_error", e.to_string())
        }
    }
}

fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_input", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
