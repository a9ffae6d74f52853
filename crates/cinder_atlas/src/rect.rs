//! # Packed Rectangle
//!
//! The unit of atlas allocation, plain-old-data so batches of committed
//! regions can be uploaded to the GPU without repacking.

use bytemuck::{Pod, Zeroable};

/// A committed or free rectangle within one virtual atlas bin.
///
/// Coordinates are texels relative to the bin origin; `bin` identifies
/// which virtual texture the region belongs to.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct PackedRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in texels.
    pub w: u32,
    /// Height in texels.
    pub h: u32,
    /// Owning bin index.
    pub bin: u32,
}

impl PackedRect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, w: u32, h: u32, bin: u32) -> Self {
        Self { x, y, w, h, bin }
    }

    /// Area in texels.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// True when either dimension is zero.
    #[inline]
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// True when `self` and `other` share interior texels in the same bin.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.bin == other.bin
            && self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    /// True when `other` lies entirely within `self` (bin-agnostic extents
    /// use bin 0 on both sides).
    #[must_use]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.w <= self.x + self.w
            && other.y + other.h <= self.y + self.h
    }
}
