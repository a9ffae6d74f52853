//! # Atlas Configuration
//!
//! Loaded once at startup from the effects config file.

use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, AtlasResult};

/// Largest bin dimension we allow - matches the guaranteed sampling limit
/// of the lowest-end target hardware.
pub(crate) const MAX_BIN_EXTENT: u32 = 16_384;

/// Maximum extent of one virtual atlas bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Maximum bin width in texels.
    pub max_width: u32,
    /// Maximum bin height in texels.
    pub max_height: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            max_width: 2048,
            max_height: 2048,
        }
    }
}

impl AtlasConfig {
    /// Checks the configured extents.
    ///
    /// # Errors
    ///
    /// [`AtlasError::ZeroExtent`] if either dimension is zero,
    /// [`AtlasError::ExtentTooLarge`] if either exceeds the device limit.
    pub fn validate(&self) -> AtlasResult<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(AtlasError::ZeroExtent {
                width: self.max_width,
                height: self.max_height,
            });
        }
        if self.max_width > MAX_BIN_EXTENT || self.max_height > MAX_BIN_EXTENT {
            return Err(AtlasError::ExtentTooLarge {
                width: self.max_width,
                height: self.max_height,
                limit: MAX_BIN_EXTENT,
            });
        }
        Ok(())
    }
}
