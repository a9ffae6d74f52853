//! # Online Texture Packer
//!
//! Assigns rectangles out of growable virtual bins, never freeing committed
//! space. A miss in the free tree grows a bin (or opens a new one) instead
//! of failing, so any request within the max extent succeeds.

use std::f32::consts::PI;

use crate::config::AtlasConfig;
use crate::error::AtlasResult;
use crate::rect::PackedRect;
use crate::size_tree::SizeTree;

/// Counters exposed for atlas debug overlays.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackerStats {
    /// Rectangles successfully packed.
    pub packed: u64,
    /// Requests rejected as unsatisfiable (over max extent or zero-sized).
    pub rejected: u64,
    /// Bin extent growth events (right or down).
    pub grown: u64,
}

/// An online rectangle packer over one or more virtual texture bins.
///
/// Free space is indexed in a [`SizeTree`]; committed rectangles are handed
/// to the caller and forgotten. There is no free/return operation - the
/// packer trades fragmentation for O(log n) amortized allocation.
///
/// # Example
///
/// ```rust,ignore
/// let mut packer = OnlineTexturePacker::new(2048, 2048);
/// let region = packer.pack(128, 64).expect("within max extent");
/// // blit pixel content into bins[region.bin] at (region.x, region.y)
/// ```
pub struct OnlineTexturePacker {
    /// Hard cap on any single bin's width.
    max_width: u32,
    /// Hard cap on any single bin's height.
    max_height: u32,
    /// Free rectangles, indexed by size.
    free: SizeTree<PackedRect>,
    /// Current extent of each bin; append-only, monotonically growing.
    bins: Vec<PackedRect>,
    /// Debug counters.
    stats: PackerStats,
}

impl OnlineTexturePacker {
    /// Creates a packer with the given per-bin maximum extent.
    ///
    /// # Arguments
    ///
    /// * `max_width` - Largest width any bin may reach
    /// * `max_height` - Largest height any bin may reach
    #[must_use]
    pub fn new(max_width: u32, max_height: u32) -> Self {
        assert!(
            max_width > 0 && max_height > 0,
            "Atlas extent must be greater than zero"
        );
        Self {
            max_width,
            max_height,
            free: SizeTree::new(),
            bins: Vec::new(),
            stats: PackerStats::default(),
        }
    }

    /// Creates a packer from a validated config.
    ///
    /// # Errors
    ///
    /// Returns the config validation error unchanged.
    pub fn from_config(config: &AtlasConfig) -> AtlasResult<Self> {
        config.validate()?;
        Ok(Self::new(config.max_width, config.max_height))
    }

    /// Returns the per-bin maximum width.
    #[inline]
    #[must_use]
    pub const fn max_width(&self) -> u32 {
        self.max_width
    }

    /// Returns the per-bin maximum height.
    #[inline]
    #[must_use]
    pub const fn max_height(&self) -> u32 {
        self.max_height
    }

    /// Current extents of all bins, indexed by bin id.
    ///
    /// The atlas builder sizes each backing texture to at least this extent.
    #[inline]
    #[must_use]
    pub fn bins(&self) -> &[PackedRect] {
        &self.bins
    }

    /// Number of bins opened so far.
    #[inline]
    #[must_use]
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Number of free rectangles currently indexed.
    #[inline]
    #[must_use]
    pub fn free_rect_count(&self) -> usize {
        self.free.len()
    }

    /// Total free area across all bins, in texels.
    #[must_use]
    pub fn free_area(&self) -> u64 {
        let mut total = 0_u64;
        self.free.traverse(|_, _, data| match data {
            Some(rect) => {
                total += rect.area();
                false
            }
            None => true,
        });
        total
    }

    /// Returns the debug counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> PackerStats {
        self.stats
    }

    /// Allocates a `(w, h)` region.
    ///
    /// # Returns
    ///
    /// `None` only for requests that can never fit a bin: zero-sized or
    /// larger than the max extent in either dimension. Everything else
    /// succeeds, growing bins as needed.
    pub fn pack(&mut self, w: u32, h: u32) -> Option<PackedRect> {
        if w == 0 || h == 0 || w > self.max_width || h > self.max_height {
            self.stats.rejected += 1;
            return None;
        }

        let rect = match self.free.search_best_fit(w, h, cost_fit) {
            Some(leaf) => {
                let free_rect = self.free.remove(leaf)?;
                self.split(free_rect, w, h)
            }
            None => self.grow(w, h, 0),
        };
        self.stats.packed += 1;
        Some(rect)
    }

    /// Carves `(w, h)` from the rectangle's origin corner, returning the
    /// leftover L-shape to the free tree as up to two strips.
    ///
    /// The cut axis favors the tighter dimension: the looser axis gets the
    /// full-length strip. Empirically tuned - do not simplify.
    fn split(&mut self, rect: PackedRect, w: u32, h: u32) -> PackedRect {
        let spare_w = rect.w - w;
        let spare_h = rect.h - h;
        if spare_w < spare_h {
            // Full-width strip below the cut, short strip to the right.
            self.release(PackedRect::new(rect.x, rect.y + h, rect.w, spare_h, rect.bin));
            self.release(PackedRect::new(rect.x + w, rect.y, spare_w, h, rect.bin));
        } else {
            // Full-height strip to the right, short strip below.
            self.release(PackedRect::new(rect.x + w, rect.y, spare_w, rect.h, rect.bin));
            self.release(PackedRect::new(rect.x, rect.y + h, w, spare_h, rect.bin));
        }
        PackedRect::new(rect.x, rect.y, w, h, rect.bin)
    }

    /// Indexes a leftover rectangle, dropping degenerate zero-area strips.
    fn release(&mut self, rect: PackedRect) {
        if rect.is_degenerate() {
            return;
        }
        let _ = self.free.insert(rect, rect.w, rect.h);
    }

    /// Grows a bin to satisfy a request nothing in the free tree fits,
    /// spilling into the next bin (allocating it if new) when this one is
    /// exhausted in both directions.
    fn grow(&mut self, w: u32, h: u32, bin: usize) -> PackedRect {
        if bin == self.bins.len() {
            tracing::debug!(bin, "opening new atlas bin");
            self.bins
                .push(PackedRect::new(0, 0, 0, 0, bin_index(bin)));
        }
        let extent = self.bins[bin];

        // Prefer the direction that stays under the current power-of-two
        // size: resizing past a pow2 boundary forces a costly reallocation
        // on hardware that prefers pow2 atlases.
        let crosses_w = near_pow2_geq(extent.w + w) != near_pow2_geq(extent.w);
        let crosses_h = near_pow2_geq(extent.h + h) != near_pow2_geq(extent.h);
        let prefer_right = if crosses_w == crosses_h {
            // Both or neither cross: grow whichever axis better evens out
            // the extent's aspect against the request.
            extent.h.abs_diff(h) > extent.w.abs_diff(w)
        } else {
            crosses_h
        };

        let can_right = extent.w + w <= self.max_width;
        let can_down = extent.h + h <= self.max_height;
        if prefer_right && can_right {
            return self.grow_right(bin, w, h);
        }
        if !prefer_right && can_down {
            return self.grow_down(bin, w, h);
        }
        if can_right {
            return self.grow_right(bin, w, h);
        }
        if can_down {
            return self.grow_down(bin, w, h);
        }
        self.grow(w, h, bin + 1)
    }

    /// Claims a `(w, h)` rectangle just past the bin's right edge.
    fn grow_right(&mut self, bin: usize, w: u32, h: u32) -> PackedRect {
        let extent = self.bins[bin];
        let claimed = PackedRect::new(extent.w, 0, w, h, extent.bin);
        if h < extent.h {
            // Unclaimed column under the new rectangle.
            self.release(PackedRect::new(extent.w, h, w, extent.h - h, extent.bin));
        } else if h > extent.h {
            // The old extent was shorter: the band beneath it is exposed.
            self.release(PackedRect::new(0, extent.h, extent.w, h - extent.h, extent.bin));
        }

        let tracker = &mut self.bins[bin];
        tracker.w = extent.w + w;
        tracker.h = extent.h.max(h);
        self.stats.grown += 1;
        tracing::trace!(bin, width = tracker.w, height = tracker.h, "bin grew right");
        claimed
    }

    /// Claims a `(w, h)` rectangle just past the bin's bottom edge.
    fn grow_down(&mut self, bin: usize, w: u32, h: u32) -> PackedRect {
        let extent = self.bins[bin];
        let claimed = PackedRect::new(0, extent.h, w, h, extent.bin);
        if w < extent.w {
            // Unclaimed row to the right of the new rectangle.
            self.release(PackedRect::new(w, extent.h, extent.w - w, h, extent.bin));
        } else if w > extent.w {
            // The old extent was narrower: the band beside it is exposed.
            self.release(PackedRect::new(extent.w, 0, w - extent.w, extent.h, extent.bin));
        }

        let tracker = &mut self.bins[bin];
        tracker.w = extent.w.max(w);
        tracker.h = extent.h + h;
        self.stats.grown += 1;
        tracing::trace!(bin, width = tracker.w, height = tracker.h, "bin grew down");
        claimed
    }
}

/// Fit cost for a candidate free rectangle.
///
/// `None` flags an exact match and short-circuits the search. Otherwise the
/// sine shape rewards near-exact and very generous fits while penalizing
/// mid-range waste. The exact functional shape governs packing density -
/// do not simplify.
#[allow(clippy::cast_precision_loss)]
fn cost_fit(w: u32, h: u32, rect: &PackedRect) -> Option<f32> {
    if rect.w == w && rect.h == h {
        return None;
    }
    let fw = rect.w as f32 / w as f32;
    let fh = rect.h as f32 / h as f32;
    let gw = (PI * (1.0 - fw * fw)).sin();
    let gh = (PI * (1.0 - fh * fh)).sin();
    Some(gw * gh + gw + gh)
}

/// Smallest power of two at or above `value`.
const fn near_pow2_geq(value: u32) -> u32 {
    value.next_power_of_two()
}

/// Bin index as stored in rectangles.
fn bin_index(bin: usize) -> u32 {
    u32::try_from(bin).expect("bin count exceeds u32")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every committed rect must sit inside its bin extent and stay
    /// disjoint from all earlier rects in the same bin.
    fn assert_committed_ok(packer: &OnlineTexturePacker, committed: &[PackedRect]) {
        for (i, rect) in committed.iter().enumerate() {
            let extent = packer.bins()[rect.bin as usize];
            assert!(
                extent.contains_rect(rect),
                "rect {rect:?} escapes extent {extent:?}"
            );
            for other in &committed[..i] {
                assert!(!rect.overlaps(other), "{rect:?} overlaps {other:?}");
            }
        }
    }

    #[test]
    fn test_first_pack_claims_bin_origin() {
        let mut packer = OnlineTexturePacker::new(256, 256);
        let rect = packer.pack(100, 100).unwrap();
        assert_eq!(rect, PackedRect::new(0, 0, 100, 100, 0));
        assert_eq!(packer.bin_count(), 1);
    }

    #[test]
    fn test_adjacent_packs_then_forced_growth() {
        let mut packer = OnlineTexturePacker::new(256, 256);

        let first = packer.pack(100, 100).unwrap();
        let second = packer.pack(100, 100).unwrap();
        assert_eq!(first.bin, 0);
        assert_eq!(second.bin, 0);
        assert!(!first.overlaps(&second));

        // 200x200 cannot fit the leftover space of a 256-cap bin holding
        // two 100x100 rects; the packer must grow - here into a new bin.
        let third = packer.pack(200, 200).unwrap();
        assert_committed_ok(&packer, &[first, second, third]);
    }

    #[test]
    fn test_oversized_and_degenerate_requests_rejected() {
        let mut packer = OnlineTexturePacker::new(128, 128);
        assert_eq!(packer.pack(129, 10), None);
        assert_eq!(packer.pack(10, 129), None);
        assert_eq!(packer.pack(0, 10), None);
        assert_eq!(packer.pack(10, 0), None);
        assert_eq!(packer.stats().rejected, 4);

        // Full-extent request still succeeds.
        assert!(packer.pack(128, 128).is_some());
    }

    #[test]
    fn test_exact_fit_reuses_free_rect() {
        let mut packer = OnlineTexturePacker::new(512, 512);
        // 64x64 next to a 64x32 leaves a 64x32 free strip below it.
        let _ = packer.pack(64, 64).unwrap();
        let _ = packer.pack(64, 32).unwrap();
        let free_before = packer.free_rect_count();
        assert!(free_before > 0);

        let reused = packer.pack(64, 32).unwrap();
        // Exact fit: consumed whole, nothing released back.
        assert_eq!(packer.free_rect_count(), free_before - 1);
        assert_eq!((reused.w, reused.h), (64, 32));
    }

    #[test]
    fn test_saturated_bin_spills_over() {
        let mut packer = OnlineTexturePacker::new(512, 512);
        let _ = packer.pack(512, 512).unwrap();
        assert_eq!(packer.free_rect_count(), 0);

        // Bin 0 is saturated in both directions: the next request spills
        // into a freshly opened bin.
        let a = packer.pack(100, 100).unwrap();
        assert_eq!(a.bin, 1);
    }

    #[test]
    fn test_free_area_accounting() {
        let mut packer = OnlineTexturePacker::new(256, 256);
        let _ = packer.pack(100, 100).unwrap();
        assert_eq!(packer.free_area(), 0);

        // Growing right for a shorter rect releases the strip beneath it.
        let _ = packer.pack(100, 40).unwrap();
        assert_eq!(packer.free_area(), u64::from(100_u32 * 60));
    }

    #[test]
    fn test_grow_prefers_pow2_friendly_axis() {
        let mut packer = OnlineTexturePacker::new(1024, 1024);
        // Extent becomes 96x96 (both under 128).
        let _ = packer.pack(96, 96).unwrap();

        // Growing right would cross a pow2 boundary (96+96 = 192 > 128);
        // growing down stays inside it (96+30 = 126), so down wins.
        let rect = packer.pack(96, 30).unwrap();
        assert_eq!((rect.x, rect.y), (0, 96));
    }

    #[test]
    fn test_many_bins_when_requests_exceed_leftovers() {
        let mut packer = OnlineTexturePacker::new(100, 100);
        let mut committed = Vec::new();
        for _ in 0..5 {
            committed.push(packer.pack(100, 100).unwrap());
        }
        assert_eq!(packer.bin_count(), 5);
        assert_committed_ok(&packer, &committed);
    }

    #[test]
    fn test_stats_track_packs() {
        let mut packer = OnlineTexturePacker::new(64, 64);
        let _ = packer.pack(10, 10);
        let _ = packer.pack(10, 10);
        let _ = packer.pack(128, 128);
        let stats = packer.stats();
        assert_eq!(stats.packed, 2);
        assert_eq!(stats.rejected, 1);
        assert!(stats.grown >= 1);
    }

    #[test]
    fn test_from_config() {
        let config = AtlasConfig {
            max_width: 256,
            max_height: 128,
        };
        let packer = OnlineTexturePacker::from_config(&config).unwrap();
        assert_eq!(packer.max_width(), 256);
        assert_eq!(packer.max_height(), 128);

        let bad = AtlasConfig {
            max_width: 0,
            max_height: 128,
        };
        assert!(OnlineTexturePacker::from_config(&bad).is_err());
    }

    #[test]
    fn test_cost_fit_shape() {
        // Exact fit is the sentinel.
        assert_eq!(cost_fit(32, 32, &PackedRect::new(0, 0, 32, 32, 0)), None);

        // A barely-larger rect must rank below a mid-range-waste rect.
        let near = cost_fit(32, 32, &PackedRect::new(0, 0, 34, 34, 0)).unwrap();
        let mid = cost_fit(32, 32, &PackedRect::new(0, 0, 48, 48, 0)).unwrap();
        assert!(near < mid, "near-exact fit must be preferred: {near} vs {mid}");
    }
}
