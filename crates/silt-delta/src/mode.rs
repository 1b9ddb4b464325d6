//! Write modes supported by the materialization pipeline.

use std::fmt;

use crate::error::{Result, WriteError};

/// How incoming data is applied to the table at the target location.
///
/// Selected from the `mode` storage option; absent means [`Self::Overwrite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Replace all data at the location.
    #[default]
    Overwrite,
    /// Replace exactly one partition, identified by the partition-key
    /// columns' (single) distinct values in the batch.
    OverwritePartition,
    /// Insert rows whose unique key matches no existing row; matching rows
    /// are skipped.
    Merge,
}

impl WriteMode {
    /// Parses the `mode` storage option.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::UnsupportedMode`] for any value other than
    /// `overwrite`, `overwrite_partition`, or `merge`.
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value {
            None | Some("overwrite") => Ok(Self::Overwrite),
            Some("overwrite_partition") => Ok(Self::OverwritePartition),
            Some("merge") => Ok(Self::Merge),
            Some(other) => Err(WriteError::unsupported_mode(other)),
        }
    }

    /// The storage-option spelling of this mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::OverwritePartition => "overwrite_partition",
            Self::Merge => "merge",
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
