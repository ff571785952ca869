use serde::{Deserialize, Serialize};

use storefront_core::CategoryId;

/// Product category. Read-only from this domain's perspective; products
/// merely reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub category_name: String,
}
