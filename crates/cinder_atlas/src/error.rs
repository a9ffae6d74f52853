//! # Atlas Error Types
//!
//! Configuration-boundary errors only. Packing itself is total: "no result"
//! is an expected `None`, never an error.

use thiserror::Error;

/// Errors that can occur when validating atlas configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AtlasError {
    /// Bin extent with a zero dimension.
    #[error("atlas extent must be non-zero: {width}x{height}")]
    ZeroExtent {
        /// Configured maximum width.
        width: u32,
        /// Configured maximum height.
        height: u32,
    },

    /// Bin extent beyond what target hardware can sample.
    #[error("atlas extent {width}x{height} exceeds device limit {limit}")]
    ExtentTooLarge {
        /// Configured maximum width.
        width: u32,
        /// Configured maximum height.
        height: u32,
        /// Largest supported dimension.
        limit: u32,
    },
}

/// Result type for atlas configuration.
pub type AtlasResult<T> = Result<T, AtlasError>;
