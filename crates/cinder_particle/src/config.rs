//! # Pool Configuration
//!
//! Loaded once at startup from the effects config file.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard ceiling on pool size - beyond this the O(n) id scans in
/// update/remove stop being "cheap at pool sizes".
pub(crate) const MAX_POOL_SIZE: u32 = 1 << 20;

/// Errors that can occur when validating pool configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A pool without slots cannot host particles.
    #[error("particle pool capacity must be greater than zero")]
    ZeroCapacity,

    /// Pool too large for the linear id-scan cost model.
    #[error("particle pool capacity {requested} exceeds limit {limit}")]
    CapacityTooLarge {
        /// Requested capacity.
        requested: u32,
        /// Largest supported capacity.
        limit: u32,
    },
}

/// Result type for pool configuration.
pub type PoolResult<T> = Result<T, PoolError>;

/// Size of one particle lifetime pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of particle slots, fixed for the pool's lifetime.
    pub max_particles: u32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_particles: 10_000,
        }
    }
}

impl PoolConfig {
    /// Checks the configured capacity.
    ///
    /// # Errors
    ///
    /// [`PoolError::ZeroCapacity`] for empty pools,
    /// [`PoolError::CapacityTooLarge`] above the supported limit.
    pub fn validate(&self) -> PoolResult<()> {
        if self.max_particles == 0 {
            return Err(PoolError::ZeroCapacity);
        }
        if self.max_particles > MAX_POOL_SIZE {
            return Err(PoolError::CapacityTooLarge {
                requested: self.max_particles,
                limit: MAX_POOL_SIZE,
            });
        }
        Ok(())
    }
}
