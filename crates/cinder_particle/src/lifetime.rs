//! # Particle Lifetime Heap
//!
//! A fixed pool of particle slots ordered by absolute death time. The heap
//! is packed: one `(death_time, id)` pair per slot, nothing else. Slot ids
//! are pre-populated at construction and only ever relocated, so finding a
//! reusable particle is a root peek and reusing it is one heap replace.

use bytemuck::{Pod, Zeroable};

use crate::config::{PoolConfig, PoolResult};

/// One packed heap slot: absolute death time plus the particle id living
/// at this heap position. Plain old data so the whole heap can be handed
/// to the GPU driver as bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SlotPair {
    /// Absolute virtual-clock time at which this slot's particle expires.
    pub death_time: f32,
    /// Particle id occupying this heap position.
    pub id: u32,
}

/// Counters exposed for effect-system debug overlays.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolStats {
    /// Slots handed out by `create`.
    pub created: u64,
    /// Creates that stole a still-alive slot.
    pub forced: u64,
    /// Particles explicitly removed before expiry.
    pub removed: u64,
    /// Non-forced creates refused because the pool was exhausted.
    pub exhausted: u64,
}

/// Min-heap of particle death times over a fixed id pool.
///
/// Every slot starts "already dead" at virtual time 0, so the first
/// `max_particles` creates succeed without any pressure. Once all slots
/// are alive, `create` either refuses (`None`) or - when forced - steals
/// the slot closest to its natural death.
///
/// # Thread Safety
///
/// NOT thread-safe. One queue per simulation, ticked by its driver.
///
/// # Example
///
/// ```rust,ignore
/// let mut queue = ParticleQueue::new(1024);
/// let id = queue.create(2.5, false).expect("pool starts empty");
/// queue.update(1.0 / 60.0);
/// ```
pub struct ParticleQueue {
    /// Packed heap: min-heap property over `death_time` across all pairs.
    /// Ids are a permutation of `[0, max_particles)` at all times.
    slots: Vec<SlotPair>,
    /// Monotonic virtual clock.
    time: f32,
    /// Maximum death time ever scheduled - O(1) "could anything be alive".
    last_death: f32,
    /// Whether the most recent `create` stole a still-alive slot.
    was_forced: bool,
    /// Debug counters.
    stats: PoolStats,
}

impl ParticleQueue {
    /// Creates a pool of `max_particles` slots, all expired at time 0.
    #[must_use]
    pub fn new(max_particles: u32) -> Self {
        assert!(
            max_particles > 0,
            "Pool capacity must be greater than zero"
        );
        let slots = (0..max_particles)
            .map(|id| SlotPair {
                death_time: 0.0,
                id,
            })
            .collect();
        Self {
            slots,
            time: 0.0,
            last_death: 0.0,
            was_forced: false,
            stats: PoolStats::default(),
        }
    }

    /// Creates a pool from a validated config.
    ///
    /// # Errors
    ///
    /// Returns the config validation error unchanged.
    pub fn from_config(config: &PoolConfig) -> PoolResult<Self> {
        config.validate()?;
        Ok(Self::new(config.max_particles))
    }

    /// Returns the pool capacity.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn max_particles(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Returns the current virtual time.
    #[inline]
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }

    /// Returns the largest death time ever scheduled.
    #[inline]
    #[must_use]
    pub const fn last_death(&self) -> f32 {
        self.last_death
    }

    /// Whether the most recent successful `create` stole a live slot.
    #[inline]
    #[must_use]
    pub const fn was_forced(&self) -> bool {
        self.was_forced
    }

    /// Returns the debug counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Counts slots that are still alive at the current time. O(n) - debug
    /// overlays only, not the per-tick dormancy check.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.death_time > self.time)
            .count()
    }

    /// The packed heap, for drivers that mirror slot state to the GPU.
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[SlotPair] {
        &self.slots
    }

    /// The packed heap as raw bytes for buffer upload.
    #[must_use]
    pub fn slots_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.slots)
    }

    /// Claims a slot for a particle dying `time_till_death` from now.
    ///
    /// The root of the heap is the slot closest to (or past) its death.
    /// If it has expired - or `force` is set - it is reassigned the new
    /// death time and its id returned; [`was_forced`](Self::was_forced)
    /// records whether a still-alive slot was stolen.
    ///
    /// # Returns
    ///
    /// `None` when every slot is alive and `force` is false. Pool
    /// exhaustion is an expected steady-state condition, not a fault.
    pub fn create(&mut self, time_till_death: f32, force: bool) -> Option<u32> {
        let root = self.slots[0];
        if root.death_time > self.time && !force {
            self.stats.exhausted += 1;
            return None;
        }
        self.was_forced = root.death_time > self.time;
        if self.was_forced {
            self.stats.forced += 1;
            tracing::trace!(id = root.id, "stealing live slot under pool pressure");
        }

        let death_time = self.time + time_till_death;
        if death_time > self.last_death {
            self.last_death = death_time;
        }
        self.stats.created += 1;
        Some(self.replace(0, death_time))
    }

    /// Shifts a particle's death time by `life_delta` seconds.
    ///
    /// The new death time is clamped up to the current time so a shrinking
    /// update can never make a live particle look already-expired and skip
    /// its death event.
    ///
    /// # Returns
    ///
    /// `false` when no slot currently holds `id`.
    pub fn update_particle(&mut self, id: u32, life_delta: f32) -> bool {
        let Some(index) = self.find_slot(id) else {
            return false;
        };
        let mut death_time = self.slots[index].death_time + life_delta;
        if death_time < self.time {
            death_time = self.time;
        }
        if death_time > self.last_death {
            self.last_death = death_time;
        }
        let _ = self.replace(index, death_time);
        true
    }

    /// Expires a particle immediately, releasing its slot for reuse.
    ///
    /// # Returns
    ///
    /// `false` when no slot currently holds `id`.
    pub fn remove_particle(&mut self, id: u32) -> bool {
        let Some(index) = self.find_slot(id) else {
            return false;
        };
        self.stats.removed += 1;
        let _ = self.replace(index, self.time);
        true
    }

    /// Advances the virtual clock.
    ///
    /// # Returns
    ///
    /// `true` while any particle could still be alive - callers use this
    /// O(1) check to put a dormant system to sleep.
    pub fn update(&mut self, time_update: f32) -> bool {
        self.time += time_update;
        self.time < self.last_death
    }

    /// Bounded linear scan for the heap position holding `id`.
    fn find_slot(&self, id: u32) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    /// Re-keys the pair at heap position `index` to `new_time`.
    ///
    /// Removes the pair (swap with the tail, re-sift the relocated pair),
    /// then reinserts the id at the tail with the new death time and sifts
    /// it up. Returns the id, which `create` hands to the caller.
    fn replace(&mut self, index: usize, new_time: f32) -> u32 {
        let tail = self.slots.len() - 1;
        let id = self.slots[index].id;
        if index != tail {
            self.slots.swap(index, tail);
            // Restore heap order over everything but the tail.
            let relocated = self.slots[index].death_time;
            let parent = index.checked_sub(1).map(|i| i / 2);
            if parent.is_some_and(|p| relocated < self.slots[p].death_time) {
                self.sift_up(index);
            } else {
                self.sift_down(index, tail);
            }
        }
        self.slots[tail] = SlotPair {
            death_time: new_time,
            id,
        };
        self.sift_up(tail);
        id
    }

    /// Moves the pair at `index` up while it dies before its parent.
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.slots[index].death_time < self.slots[parent].death_time {
                self.slots.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Moves the pair at `index` down while a child dies before it,
    /// considering only the first `len` pairs.
    fn sift_down(&mut self, mut index: usize, len: usize) {
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < len && self.slots[right].death_time < self.slots[left].death_time {
                child = right;
            }
            if self.slots[child].death_time < self.slots[index].death_time {
                self.slots.swap(index, child);
                index = child;
            } else {
                break;
            }
        }
    }
}
