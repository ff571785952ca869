//! Products domain module.
//!
//! This crate contains business rules for the product catalog, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage). The
//! centerpiece is [`reconcile`], which computes the minimal association
//! delta for a product's tag set.

pub mod category;
pub mod product;
pub mod tag;

pub use category::Category;
pub use product::{NewProduct, Product, ProductDetail, ProductPatch};
pub use tag::{NewAssociation, ReconcilePlan, Tag, TagAssociation, reconcile};
