//! Transient visual-effect records.
//!
//! Laser trails are a side artifact of tower shots kept only long enough
//! for the renderer to fade them out; they have no simulation effect
//! beyond existing.

use data_defence_core::DVec2;

use crate::store::Arena;

/// One fading laser beam between a tower and the minion it hit.
#[derive(Clone, Copy, Debug)]
pub struct LaserTrail {
    /// World position the beam starts from.
    pub source: DVec2,
    /// World position the beam ends at.
    pub target: DVec2,
    /// Seconds of life remaining.
    pub lifetime: f64,
    /// Lifetime the trail started with, for fade-ratio computation.
    pub max_lifetime: f64,
}

impl LaserTrail {
    /// Creates a trail between the two points with the given time to live.
    #[must_use]
    pub const fn new(source: DVec2, target: DVec2, time_to_live: f64) -> Self {
        Self {
            source,
            target,
            lifetime: time_to_live,
            max_lifetime: time_to_live,
        }
    }
}

/// Ages every trail by `dt` seconds and purges the expired ones.
pub fn decay_laser_trails(trails: &mut Arena<LaserTrail>, dt: f64) {
    for (_, trail) in trails.iter_mut() {
        trail.lifetime -= dt;
    }
    let _ = trails.remove_where(|trail| trail.lifetime <= 0.0);
}
