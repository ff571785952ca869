//! Tags and the product/tag association reconciler.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use storefront_core::{AssociationId, DomainError, DomainResult, ProductId, TagId};

/// A tag. Read-only from this domain's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub tag_name: String,
}

/// A persisted association row linking one product to one tag.
///
/// Invariant: at most one row per (product, tag) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAssociation {
    pub id: AssociationId,
    pub product_id: ProductId,
    pub tag_id: TagId,
}

/// An association row to be inserted (no identifier yet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NewAssociation {
    pub product_id: ProductId,
    pub tag_id: TagId,
}

/// The minimal delta that transforms a product's current association set into
/// the desired tag set. The caller must apply both halves; applying one
/// without the other leaves persisted state inconsistent with the desired set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub to_delete: Vec<AssociationId>,
    pub to_insert: Vec<NewAssociation>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_insert.is_empty()
    }
}

/// Compute the association delta for a product update.
///
/// - `desired`: the client-supplied target tag set. Duplicates are collapsed
///   (set semantics) and order is irrelevant. `None` means the field was
///   absent from the request, which is an error: defaulting to empty would
///   silently delete every association on a malformed request.
/// - `current`: the association rows currently persisted for this product.
///
/// Associations whose tag appears in both sets are left untouched, so the
/// plan is minimal rather than delete-all/insert-all.
pub fn reconcile(
    product_id: ProductId,
    desired: Option<&[TagId]>,
    current: &[TagAssociation],
) -> DomainResult<ReconcilePlan> {
    let desired = desired.ok_or_else(|| DomainError::validation("tagIds is required"))?;
    let desired: BTreeSet<TagId> = desired.iter().copied().collect();
    let current_tag_ids: BTreeSet<TagId> = current.iter().map(|a| a.tag_id).collect();

    let to_insert = desired
        .iter()
        .filter(|tag_id| !current_tag_ids.contains(tag_id))
        .map(|&tag_id| NewAssociation { product_id, tag_id })
        .collect();

    let to_delete = current
        .iter()
        .filter(|assoc| !desired.contains(&assoc.tag_id))
        .map(|assoc| assoc.id)
        .collect();

    Ok(ReconcilePlan { to_delete, to_insert })
}
