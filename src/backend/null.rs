//! Null GPU backend for testing and development.
//!
//! Hands out monotonically increasing ids without touching a device and
//! records every unit bind so tests can assert on binding behavior. A
//! `bindless` flag controls whether texture+sampler pairs report nonzero
//! 64-bit handles.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::types::SamplerParameters;

use super::{BindTarget, GpuBackend, GpuSamplerId, GpuTextureId, TextureDescriptor};

/// One recorded unit bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindRecord {
    Texture {
        unit: u32,
        target: BindTarget,
        id: u64,
    },
    Sampler {
        unit: u32,
        id: u64,
    },
}

/// Null GPU backend.
#[derive(Debug)]
pub struct NullBackend {
    bindless: bool,
    next_id: AtomicU64,
    alive_textures: AtomicI64,
    alive_samplers: AtomicI64,
    bind_log: Mutex<Vec<BindRecord>>,
}

impl NullBackend {
    /// Create a new null backend without bindless support.
    pub fn new() -> Self {
        Self {
            bindless: false,
            next_id: AtomicU64::new(1),
            alive_textures: AtomicI64::new(0),
            alive_samplers: AtomicI64::new(0),
            bind_log: Mutex::new(Vec::new()),
        }
    }

    /// Create a backend that reports nonzero bindless handles.
    pub fn with_bindless() -> Self {
        Self {
            bindless: true,
            ..Self::new()
        }
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of textures created and not yet destroyed.
    pub fn alive_textures(&self) -> i64 {
        self.alive_textures.load(Ordering::Relaxed)
    }

    /// Number of samplers created and not yet destroyed.
    pub fn alive_samplers(&self) -> i64 {
        self.alive_samplers.load(Ordering::Relaxed)
    }

    /// Snapshot of the recorded unit binds, in call order.
    pub fn bind_log(&self) -> Vec<BindRecord> {
        self.bind_log.lock().clone()
    }

    /// Forget recorded binds.
    pub fn clear_bind_log(&self) {
        self.bind_log.lock().clear();
    }
}

impl GpuBackend for NullBackend {
    fn name(&self) -> &'static str {
        "Null Backend"
    }

    fn create_texture(&self, descriptor: &TextureDescriptor) -> GpuTextureId {
        let id = self.allocate_id();
        self.alive_textures.fetch_add(1, Ordering::Relaxed);
        log::trace!(
            "NullBackend: creating texture {:?} ({}x{}x{}) -> {}",
            descriptor.label,
            descriptor.width,
            descriptor.height,
            descriptor.depth,
            id
        );
        GpuTextureId(id)
    }

    fn destroy_texture(&self, texture: GpuTextureId) {
        if texture.is_null() {
            return;
        }
        self.alive_textures.fetch_sub(1, Ordering::Relaxed);
        log::trace!("NullBackend: destroying texture {}", texture.raw());
    }

    fn create_sampler(&self, parameters: &SamplerParameters) -> GpuSamplerId {
        let id = self.allocate_id();
        self.alive_samplers.fetch_add(1, Ordering::Relaxed);
        log::trace!("NullBackend: creating sampler {:?} -> {}", parameters, id);
        GpuSamplerId(id)
    }

    fn destroy_sampler(&self, sampler: GpuSamplerId) {
        if sampler.is_null() {
            return;
        }
        self.alive_samplers.fetch_sub(1, Ordering::Relaxed);
        log::trace!("NullBackend: destroying sampler {}", sampler.raw());
    }

    fn texture_sampler_handle(&self, texture: GpuTextureId, sampler: GpuSamplerId) -> u64 {
        if !self.bindless || texture.is_null() {
            return 0;
        }
        // Ids start at 1, so the composed handle is always nonzero.
        (texture.raw() << 32) | sampler.raw()
    }

    fn bind_texture(&self, unit: u32, target: BindTarget, texture: GpuTextureId) {
        log::trace!(
            "NullBackend: bind_texture unit={} target={:?} id={}",
            unit,
            target,
            texture.raw()
        );
        self.bind_log.lock().push(BindRecord::Texture {
            unit,
            target,
            id: texture.raw(),
        });
    }

    fn bind_sampler(&self, unit: u32, sampler: GpuSamplerId) {
        log::trace!(
            "NullBackend: bind_sampler unit={} id={}",
            unit,
            sampler.raw()
        );
        self.bind_log.lock().push(BindRecord::Sampler {
            unit,
            id: sampler.raw(),
        });
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_nonzero() {
        let backend = NullBackend::new();
        let a = backend.create_texture(&TextureDescriptor::constant_1x1("a", [1.0; 4]));
        let b = backend.create_texture(&TextureDescriptor::constant_1x1("b", [1.0; 4]));
        assert!(!a.is_null());
        assert!(!b.is_null());
        assert_ne!(a, b);
    }

    #[test]
    fn test_alive_counters() {
        let backend = NullBackend::new();
        let tex = backend.create_texture(&TextureDescriptor::constant_1x1("t", [0.0; 4]));
        let sampler = backend.create_sampler(&SamplerParameters::default());
        assert_eq!(backend.alive_textures(), 1);
        assert_eq!(backend.alive_samplers(), 1);
        backend.destroy_texture(tex);
        backend.destroy_sampler(sampler);
        assert_eq!(backend.alive_textures(), 0);
        assert_eq!(backend.alive_samplers(), 0);
    }

    #[test]
    fn test_bindless_handles() {
        let backend = NullBackend::with_bindless();
        let tex = backend.create_texture(&TextureDescriptor::constant_1x1("t", [0.0; 4]));
        let sampler = backend.create_sampler(&SamplerParameters::default());
        assert_ne!(backend.texture_sampler_handle(tex, sampler), 0);

        let plain = NullBackend::new();
        let tex = plain.create_texture(&TextureDescriptor::constant_1x1("t", [0.0; 4]));
        let sampler = plain.create_sampler(&SamplerParameters::default());
        assert_eq!(plain.texture_sampler_handle(tex, sampler), 0);
    }

    #[test]
    fn test_bind_log_records_order() {
        let backend = NullBackend::new();
        backend.bind_texture(3, BindTarget::Texture2d, GpuTextureId(7));
        backend.bind_sampler(3, GpuSamplerId(9));
        assert_eq!(
            backend.bind_log(),
            vec![
                BindRecord::Texture {
                    unit: 3,
                    target: BindTarget::Texture2d,
                    id: 7
                },
                BindRecord::Sampler { unit: 3, id: 9 },
            ]
        );
        backend.clear_bind_log();
        assert!(backend.bind_log().is_empty());
    }
}
