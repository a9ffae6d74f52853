//! # CINDER Atlas
//!
//! Online texture-atlas allocation for the effects pipeline:
//! - `SizeTree` - height-balanced tree of free rectangles, indexed by size
//! - `OnlineTexturePacker` - assigns regions of growable virtual bins
//!
//! ## Architecture Rules
//!
//! 1. **Never reclaim** - committed rectangles are gone; fragmentation is
//!    accepted in exchange for O(log n) amortized allocation
//! 2. **Never fail in-range** - requests within the max extent always pack,
//!    by growing an existing bin or opening a new one
//! 3. **Deterministic** - identical request sequences produce identical
//!    layouts, required for reproducible atlas builds
//!
//! The caller blits pixel content into the returned regions and sizes the
//! backing textures from the bin extents; no GPU work happens here.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

mod config;
mod error;
mod packer;
mod rect;
mod size_tree;

pub use config::AtlasConfig;
pub use error::{AtlasError, AtlasResult};
pub use packer::{OnlineTexturePacker, PackerStats};
pub use rect::PackedRect;
pub use size_tree::{LeafId, SizeTree};
