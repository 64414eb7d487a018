use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::scene::Color;

/// Identifies one of the shared drawable materials.
///
/// Ground and foliage materials come in one variant per environment mode;
/// scene nodes reference them by key and never own them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKey {
    GroundNatural,
    GroundSnow,
    FoliageNatural,
    FoliageWinter,
}

impl MaterialKey {
    pub const ALL: [MaterialKey; 4] = [
        MaterialKey::GroundNatural,
        MaterialKey::GroundSnow,
        MaterialKey::FoliageNatural,
        MaterialKey::FoliageWinter,
    ];
}

/// Surface description for mesh rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Color,
    pub roughness: f32,
    pub flat_shading: bool,
}

impl Material {
    fn ground_natural() -> Self {
        Self {
            color: Color::rgb(0.24, 0.44, 0.19),
            roughness: 0.95,
            flat_shading: true,
        }
    }

    fn ground_snow() -> Self {
        Self {
            color: Color::rgb(0.92, 0.94, 0.97),
            roughness: 0.85,
            flat_shading: true,
        }
    }

    fn foliage_natural() -> Self {
        Self {
            color: Color::rgb(0.13, 0.38, 0.15),
            roughness: 0.9,
            flat_shading: true,
        }
    }

    fn foliage_winter() -> Self {
        Self {
            color: Color::rgb(0.55, 0.62, 0.60),
            roughness: 0.8,
            flat_shading: true,
        }
    }
}

/// Material description for point-sprite particles. Unlike the shared mesh
/// materials this one is owned by the node that uses it and is released with
/// the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsMaterial {
    pub color: Color,
    pub size: f32,
}

/// Lazily-populated cache of the shared drawable materials.
///
/// `ensure` fills the cache exactly once; there is no teardown and the
/// contents live as long as the cache value itself. Environment rebuilds read
/// from it and never write.
#[derive(Debug, Default)]
pub struct MaterialCache {
    materials: HashMap<MaterialKey, Material>,
}

impl MaterialCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate one material per key on the first call; every later call is
    /// a no-op regardless of mode or options.
    pub fn ensure(&mut self) {
        if !self.materials.is_empty() {
            return;
        }

        self.materials
            .insert(MaterialKey::GroundNatural, Material::ground_natural());
        self.materials
            .insert(MaterialKey::GroundSnow, Material::ground_snow());
        self.materials
            .insert(MaterialKey::FoliageNatural, Material::foliage_natural());
        self.materials
            .insert(MaterialKey::FoliageWinter, Material::foliage_winter());

        debug!("material cache populated with {} entries", self.materials.len());
    }

    pub fn get(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(&key)
    }

    pub fn is_populated(&self) -> bool {
        !self.materials.is_empty()
    }
}
