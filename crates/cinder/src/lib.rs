//! # CINDER
//!
//! Particle-effects support pipeline: online texture atlas packing for
//! effect sprites plus fixed-pool lifetime queues for the particles that
//! use them.
//!
//! This facade re-exports the public surface of the member crates so a
//! renderer can depend on one crate:
//! - [`cinder_atlas`] - grow-only atlas packer and the bounding-box size
//!   tree behind it
//! - [`cinder_particle`] - fixed-capacity particle pools keyed on death
//!   time
//! - [`cinder_core`] - the generic min-heap and timeout queue the rest
//!   is built on

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub use cinder_atlas::{
    AtlasConfig, AtlasError, AtlasResult, LeafId, OnlineTexturePacker, PackedRect, PackerStats,
    SizeTree,
};
pub use cinder_core::{MinHeap, TimeoutQueue};
pub use cinder_particle::{ParticleQueue, PoolConfig, PoolError, PoolResult, PoolStats, SlotPair};
