//! Quality preset catalog.
//!
//! One schema covers every preset: earlier revisions of the scene carried
//! several divergent tables (some without a tree density, some calling the
//! render scale a resolution); the superset lives here and absent fields
//! default explicitly in the per-preset constructors.

use serde::Serialize;
use tracing::warn;

/// Named bundle of rendering-quality tuning parameters.
///
/// Immutable once defined. Exactly one preset is active at a time; switching
/// is a caller-driven rebuild trigger, never an automatic reaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub name: &'static str,
    /// Geometry density multiplier, feeds segment and instance counts.
    pub detail_scale: f32,
    /// Camera far-plane distance; consumed by the render shell, carried here
    /// so one lookup answers for the whole preset.
    pub view_distance: f32,
    /// Framebuffer scale relative to the window.
    pub render_scale: f32,
    /// Vegetation density multiplier.
    pub tree_density: f32,
}

/// Preset used when a requested name is not in the catalog.
pub const DEFAULT_PRESET_NAME: &str = "medium";

/// Catalog names in declaration order. `names()` and iteration-order
/// guarantees are anchored to this slice.
const NAMES: [&str; 4] = ["low", "medium", "high", "ultra"];

impl Preset {
    fn low() -> Self {
        Self {
            name: "low",
            detail_scale: 0.5,
            view_distance: 600.0,
            render_scale: 0.75,
            tree_density: 0.5,
        }
    }

    fn medium() -> Self {
        Self {
            name: "medium",
            detail_scale: 1.0,
            view_distance: 1200.0,
            render_scale: 1.0,
            // Earlier medium tables omitted this; the documented default is 1.0.
            tree_density: 1.0,
        }
    }

    fn high() -> Self {
        Self {
            name: "high",
            detail_scale: 1.5,
            view_distance: 2000.0,
            render_scale: 1.0,
            tree_density: 1.3,
        }
    }

    fn ultra() -> Self {
        Self {
            name: "ultra",
            detail_scale: 2.0,
            view_distance: 3200.0,
            render_scale: 1.25,
            tree_density: 1.6,
        }
    }

    /// Look up a preset by name, case-insensitively.
    ///
    /// Returns None if the name is not in the catalog.
    pub fn get(name: &str) -> Option<Preset> {
        match name.to_lowercase().as_str() {
            "low" => Some(Preset::low()),
            "medium" => Some(Preset::medium()),
            "high" => Some(Preset::high()),
            "ultra" => Some(Preset::ultra()),
            _ => None,
        }
    }

    /// All catalog names, in declaration order. Stable across calls.
    pub fn names() -> &'static [&'static str] {
        &NAMES
    }

    /// Look up a preset, falling back to the default preset for unknown
    /// names. The fallback is logged, not an error: a bad name in a settings
    /// file should not take the session down.
    pub fn resolve_or_default(name: &str) -> Preset {
        match Preset::get(name) {
            Some(preset) => preset,
            None => {
                warn!(
                    "unknown preset '{}', falling back to '{}'",
                    name, DEFAULT_PRESET_NAME
                );
                Preset::get(DEFAULT_PRESET_NAME).expect("default preset must exist")
            }
        }
    }
}
