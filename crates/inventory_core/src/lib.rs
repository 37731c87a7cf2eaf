//! Shared product inventory domain primitives.
//!
//! This crate owns the record contract, the error taxonomy, request routing
//! and the paged scanner that drains a table page by page. It intentionally
//! excludes AWS SDK and Lambda runtime concerns; the store is reached only
//! through the [`store::ProductStore`] trait.

pub mod contract;
pub mod error;
pub mod routing;
pub mod scanner;
pub mod store;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
