//! # CINDER Core Queues
//!
//! Single-threaded queue primitives shared across the effects pipeline:
//! - Comparator-driven binary min-heap with removal by value
//! - Virtual-clock timeout queue ("fire when overdue" semantics)
//!
//! ## Architecture Rules
//!
//! 1. **No hidden I/O or threading** - callers own and serialize access
//! 2. **Total operations** - absence is reported via `Option`/`bool`, never panics
//! 3. **Deterministic** - same operation sequence, same outcome, always
//!
//! ## Example
//!
//! ```rust,ignore
//! use cinder_core::TimeoutQueue;
//!
//! let mut timers: TimeoutQueue<&str> = TimeoutQueue::new();
//! timers.insert("stop-emitter", 1.5);
//! timers.update(2.0);
//! assert!(timers.has_next());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod queue;

pub use queue::{MinHeap, TimeoutQueue};
