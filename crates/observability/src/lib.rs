//! Tracing, logging, metrics (shared setup).

pub mod tracing;

pub use crate::tracing::init;
