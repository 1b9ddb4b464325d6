//! # silt-store
//!
//! The Silt materialization pipeline.
//!
//! [`Materializer::materialize`] takes a
//! `CREATE EXTERNAL TABLE ... AS SELECT` directive and:
//!
//! 1. parses it into a target and a residual select statement
//! 2. executes the select on the configured [`QueryEngine`]
//! 3. under a wall-clock budget, ensures catalog metadata exists, fetches
//!    scoped storage credentials, and applies the selected write strategy
//! 4. on write failure after a fresh catalog creation, deletes the catalog
//!    entry again before surfacing the original error
//!
//! Materialization is all-or-nothing from the caller's perspective, with one
//! documented exception: [`StoreError::TimedOut`] means *unknown outcome* —
//! the store operation was abandoned, not cancelled, and may still complete
//! in the background.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod supervisor;

pub use engine::{DataFusionEngine, EngineError, QueryEngine, QueryOutput};
pub use error::{Result, StoreError};
pub use pipeline::Materializer;
pub use supervisor::run_bounded;
