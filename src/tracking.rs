//! Dirty state propagation between the scene and the draw layer.
//!
//! Materials consume dirty bits during sync and report side effects back
//! through the [`ChangeTracker`]: draw batch invalidation when shader
//! sources change, and rprim re-resolution when the material's shading
//! structure changes.

use bitflags::bitflags;
use parking_lot::Mutex;

bitflags! {
    /// Dirty bits of a material and the notifications it can raise.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MaterialDirtyBits: u32 {
        /// The compiled network (shader sources) may have changed.
        const RESOURCE = 1 << 0;
        /// Parameter values may have changed.
        const PARAMS = 1 << 1;
        /// Raised on rprims when their material must be re-resolved.
        const MATERIAL_ID = 1 << 2;

        /// Initial state of a freshly inserted material.
        const ALL_DIRTY = Self::RESOURCE.bits() | Self::PARAMS.bits();
    }
}

impl MaterialDirtyBits {
    /// Fully synced, nothing to do.
    pub const CLEAN: Self = Self::empty();

    /// Whether a sync pass has any work to perform.
    pub fn needs_sync(&self) -> bool {
        self.intersects(Self::RESOURCE | Self::PARAMS)
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    batches_dirty_count: u64,
    rprims_dirty_count: u64,
    rprim_dirty_bits: MaterialDirtyBits,
}

/// Collects invalidation raised by materials during a sync pass.
///
/// The embedding renderer inspects the counters after syncing to decide
/// whether draw batches must be rebuilt and which rprim updates to
/// schedule. Counters only ever grow; the consumer diffs them between
/// passes.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    state: Mutex<TrackerState>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate all draw batches.
    pub fn mark_batches_dirty(&self) {
        let mut state = self.state.lock();
        state.batches_dirty_count += 1;
        log::trace!("ChangeTracker: draw batches marked dirty");
    }

    /// Mark every rprim dirty with the given bits.
    pub fn mark_all_rprims_dirty(&self, bits: MaterialDirtyBits) {
        let mut state = self.state.lock();
        state.rprims_dirty_count += 1;
        state.rprim_dirty_bits |= bits;
        log::trace!("ChangeTracker: all rprims marked dirty with {:?}", bits);
    }

    /// How many times draw batches were invalidated.
    pub fn batches_dirty_count(&self) -> u64 {
        self.state.lock().batches_dirty_count
    }

    /// How many times a full rprim invalidation was raised.
    pub fn rprims_dirty_count(&self) -> u64 {
        self.state.lock().rprims_dirty_count
    }

    /// Union of all bits raised against rprims so far.
    pub fn rprim_dirty_bits(&self) -> MaterialDirtyBits {
        self.state.lock().rprim_dirty_bits
    }
}

// Ensure ChangeTracker is Send + Sync
static_assertions::assert_impl_all!(ChangeTracker: Send, Sync);
