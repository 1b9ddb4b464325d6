//! Shared test utilities for Silt integration tests.
//!
//! This crate provides:
//! - [`StubUnityCatalog`]: an in-process catalog server with request
//!   counters, for exercising the REST client and the compensation path
//! - Factory functions for Arrow record batches used by write-engine and
//!   pipeline tests
//!
//! # Example
//!
//! ```rust,ignore
//! use silt_test_utils::StubUnityCatalog;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let stub = StubUnityCatalog::start().await;
//!     // point a UnityCatalogClient at stub.endpoint() ...
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
// Test utilities use expect/unwrap for cleaner test code - panics are acceptable in tests
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::missing_panics_doc)]

pub mod batches;
pub mod stub_catalog;

pub use batches::*;
pub use stub_catalog::*;

/// Initialize test logging (call once per test module).
pub fn init_test_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("silt=debug".parse().expect("valid directive")),
        )
        .with_test_writer()
        .try_init();
}
