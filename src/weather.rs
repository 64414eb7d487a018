//! Per-frame advancement of the weather particle buffer.

use rand::Rng;
use tracing::warn;

use crate::environment::NodeRole;
use crate::scene::{NodeKind, Scene};

/// Advances the weather particle buffer built by the environment.
///
/// The buffer is recycled in place: a particle that falls below the ground
/// is re-seeded at a random height near the top of the column, never
/// reallocated. Advancement scales with elapsed time, not frame count, so
/// fall speed is identical at any frame rate.
#[derive(Debug, Clone, Copy)]
pub struct WeatherSimulator {
    /// Fall speed in world units per second.
    pub fall_rate: f32,
    /// Height a recycled particle respawns at, lower bound.
    pub respawn_floor: f32,
    /// Width of the respawn band above `respawn_floor`.
    pub respawn_jitter: f32,
}

impl Default for WeatherSimulator {
    fn default() -> Self {
        Self {
            fall_rate: 80.0,
            respawn_floor: 400.0,
            respawn_jitter: 40.0,
        }
    }
}

impl WeatherSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every particle by `fall_rate * dt`; recycle those that cross
    /// zero into `[respawn_floor, respawn_floor + respawn_jitter)`.
    ///
    /// No scene, or no weather node in it, is a quiet no-op: natural mode
    /// simply has nothing to advance.
    pub fn advance(&self, scene: Option<&mut Scene>, rng: &mut impl Rng, dt: f32) {
        let Some(scene) = scene else {
            warn!("weather advance skipped: no scene attached");
            return;
        };

        let Some(node) = scene.get_named_mut(NodeRole::Weather.node_name()) else {
            return;
        };
        let NodeKind::Points { positions, .. } = &mut node.kind else {
            return;
        };

        let drop = self.fall_rate * dt;
        for p in positions.iter_mut() {
            p.z -= drop;
            if p.z < 0.0 {
                p.z = self.respawn_floor + rng.gen_range(0.0..self.respawn_jitter);
            }
        }
    }
}
