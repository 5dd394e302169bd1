//! Texture unit assignment for a draw batch.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::textures::{ptex_layout_field_name, NamedTextureHandle, TextureKind};

/// Default number of texture units a batch may use.
pub const DEFAULT_UNIT_LIMIT: u32 = 32;

/// Maps binding names to texture units for one draw batch.
///
/// Units are assigned in insertion order and stay stable until `clear`.
/// Batches own their map; two batches never share unit assignments.
#[derive(Debug)]
pub struct TextureUnitMap {
    units: HashMap<String, u32>,
    next_unit: u32,
    limit: u32,
}

impl TextureUnitMap {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_UNIT_LIMIT)
    }

    pub fn with_limit(limit: u32) -> Self {
        Self {
            units: HashMap::new(),
            next_unit: 0,
            limit,
        }
    }

    /// Assign a unit to a binding name, or return the existing one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TextureUnitsExhausted`] when the batch is out of
    /// units.
    pub fn assign(&mut self, name: &str) -> Result<u32> {
        if let Some(&unit) = self.units.get(name) {
            return Ok(unit);
        }
        if self.next_unit >= self.limit {
            return Err(Error::TextureUnitsExhausted(self.limit));
        }
        let unit = self.next_unit;
        self.next_unit += 1;
        self.units.insert(name.to_owned(), unit);
        Ok(unit)
    }

    /// Assign units for every binding a handle list needs, including the
    /// extra `_layout` binding of ptex textures.
    pub fn assign_for_handles(&mut self, textures: &[NamedTextureHandle]) -> Result<()> {
        for texture in textures {
            self.assign(&texture.name)?;
            if texture.kind == TextureKind::Ptex {
                self.assign(&ptex_layout_field_name(&texture.name))?;
            }
        }
        Ok(())
    }

    pub fn unit_for(&self, name: &str) -> Option<u32> {
        self.units.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn clear(&mut self) {
        self.units.clear();
        self.next_unit = 0;
    }
}

impl Default for TextureUnitMap {
    fn default() -> Self {
        Self::new()
    }
}
