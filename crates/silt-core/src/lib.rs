//! # silt-core
//!
//! Core primitives for the Silt materialization pipeline.
//!
//! This crate provides the foundational types used across all Silt components:
//!
//! - **Materialization Target**: the parsed form of a
//!   `CREATE EXTERNAL TABLE ... AS SELECT` directive
//! - **Configuration**: environment-sourced settings for the catalog
//!   endpoint, default storage region, and the store budget
//! - **Error Types**: parse-time error definitions
//! - **Observability**: logging initialization and span helpers
//!
//! Higher-level crates (`silt-uc`, `silt-delta`, `silt-store`) build on these
//! primitives; cross-crate interaction happens through the types defined
//! here.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod error;
pub mod observability;
pub mod target;

pub use config::StoreConfig;
pub use error::{DirectiveError, Result};
pub use observability::{init_logging, LogFormat};
pub use target::{
    is_materialization_directive, MaterializationTarget, ParsedDirective, QualifiedTableName,
};
