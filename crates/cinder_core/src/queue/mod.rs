//! # Queue Structures
//!
//! Priority queues for tick-driven simulation code.
//!
//! ## Design Philosophy
//!
//! Both structures run to completion on the caller's thread:
//! - No locking, no suspension points
//! - Expiry is pull-based - nothing fires until the caller ticks the clock
//! - Removal by value is a bounded linear scan, acceptable at pool sizes

mod min_heap;
mod timeout;

pub use min_heap::MinHeap;
pub use timeout::TimeoutQueue;
