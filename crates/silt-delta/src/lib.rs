//! # silt-delta
//!
//! Delta Lake write support for the Silt materialization pipeline.
//!
//! Current scope:
//! - Three write strategies over the `deltalake` crate, dispatched on
//!   [`WriteMode`]: unconditional overwrite, single-partition overwrite,
//!   and insert-only merge
//! - Table existence probing for a storage location
//!
//! Non-goals (for now):
//! - Schema evolution
//! - Table maintenance (vacuum, optimize, checkpointing)

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod error;
pub mod mode;
pub mod writer;

pub use error::{Result, WriteError};
pub use mode::WriteMode;
pub use writer::{table_exists, write};
