//! # CINDER Particle Pool
//!
//! Lifetime tracking for a fixed pool of particle slots:
//! - Min-heap on absolute death time, two words per slot
//! - O(log n) create/update/remove, O(1) "anything still alive?"
//! - Forced reuse steals the earliest-dying slot under pool pressure
//!
//! ## Architecture Rules
//!
//! 1. **Fixed pool** - all slots exist from construction; ids are a
//!    permutation of `[0, max_particles)` at all times
//! 2. **No hidden work** - the caller ticks the virtual clock; nothing
//!    expires between ticks
//! 3. **GPU-friendly** - slot pairs are plain old data, castable to bytes
//!
//! The simulation driver maps each id to a row in its GPU-resident state
//! buffer; this crate knows nothing of that buffer's layout.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

mod config;
mod lifetime;

pub use config::{PoolConfig, PoolError, PoolResult};
pub use lifetime::{ParticleQueue, PoolStats, SlotPair};
