//! # silt-uc
//!
//! Unity Catalog client support for the Silt materialization pipeline.
//!
//! This crate provides:
//!
//! - A stateless [`client::UnityCatalogClient`] over the Unity Catalog 2.1
//!   REST surface (schemas, tables, temporary table credentials)
//! - The [`registrar::CatalogRegistrar`], which ensures schema and table
//!   metadata exist before a write and vends scoped storage credentials
//! - Conversion from Arrow schemas to Unity Catalog column payloads
//!
//! The remote catalog is treated as the single authority: nothing is cached
//! across calls, so concurrent catalog changes are observed on the next
//! round trip.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod client;
pub mod error;
pub mod registrar;
pub mod schema;

pub use client::{
    AwsTempCredentials, ColumnInfo, CreateTableRequest, SchemaInfo, TableInfo,
    TemporaryTableCredentials, UnityCatalogClient,
};
pub use error::{CatalogError, Result};
pub use registrar::{CatalogRegistrar, EnsuredTable};
pub use schema::columns_from_schema;
