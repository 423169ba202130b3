//! Tower entity state and per-tower stat resolution.

use data_defence_core::{
    config::GameConfig, resolve_modified_stat, GridPos, ScalingValue, TowerKind,
};

use crate::minions::Minion;
use crate::store::Key;

/// Handle to a tower inside the stage's tower store.
pub type TowerId = Key<Tower>;

/// A stationary structure. Basic towers intercept minions; the goal tower is
/// a tower like any other except that it never attacks.
#[derive(Clone, Debug, PartialEq)]
pub struct Tower {
    /// What kind of tower this is.
    pub kind: TowerKind,
    /// Tile the tower stands on.
    pub pos: GridPos,
    /// Stats as of the latest resolution pass.
    pub stats: TowerStats,
    /// Per-tower modifier stacks applied after the player's global stacks.
    pub local_mods: TowerStatModifiers,
    /// Direction the turret points, in radians.
    pub facing: f64,
    /// Minion currently being tracked, if any.
    pub tracking: Option<Key<Minion>>,
}

/// Resolved tower stats. All fields except `health` and `reload` are
/// recomputed from config bases and modifier stacks every resolution pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Remaining health. Never exceeds `max_health` after resolution.
    pub health: f64,
    /// Resolved maximum health.
    pub max_health: f64,
    /// Resolved targeting radius in tiles.
    pub range: f64,
    /// Seconds until the next shot may fire.
    pub reload: f64,
    /// Resolved seconds between shots.
    pub reload_time: f64,
    /// Resolved damage per shot.
    pub attack_damage: f64,
}

/// One modifier stack per tower stat.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TowerStatModifiers {
    /// Modifier stack for maximum health.
    pub max_health: ScalingValue,
    /// Modifier stack for targeting range.
    pub range: ScalingValue,
    /// Modifier stack for damage per shot.
    pub attack_damage: ScalingValue,
    /// Modifier stack for reload cadence.
    pub reload: ScalingValue,
}

impl Tower {
    /// Creates a tower of the given kind on the given tile with base stats.
    #[must_use]
    pub fn new(kind: TowerKind, pos: GridPos, config: &GameConfig) -> Self {
        Self {
            kind,
            pos,
            stats: TowerStats {
                health: config.base_tower_health,
                max_health: config.base_tower_health,
                range: config.base_tower_range,
                reload: 0.0,
                reload_time: config.base_tower_reload,
                attack_damage: config.base_tower_attack_damage,
            },
            local_mods: TowerStatModifiers::default(),
            facing: 0.0,
            tracking: None,
        }
    }

    /// Re-resolves every derived stat from config bases through the global
    /// and local modifier stacks, then clamps health to the new maximum.
    pub fn resolve_stats(&mut self, config: &GameConfig, global: &TowerStatModifiers) {
        self.stats.max_health = resolve_modified_stat(
            config.base_tower_health,
            &[global.max_health, self.local_mods.max_health],
        );
        self.stats.range = resolve_modified_stat(
            config.base_tower_range,
            &[global.range, self.local_mods.range],
        );
        self.stats.attack_damage = resolve_modified_stat(
            config.base_tower_attack_damage,
            &[global.attack_damage, self.local_mods.attack_damage],
        );
        self.stats.reload_time = resolve_modified_stat(
            config.base_tower_reload,
            &[global.reload, self.local_mods.reload],
        );

        self.stats.health = self.stats.health.min(self.stats.max_health);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tower_starts_ready_to_fire() {
        let tower = Tower::new(TowerKind::Basic, GridPos::new(2, 1), &GameConfig::default());
        assert_eq!(tower.stats.reload, 0.0);
        assert_eq!(tower.stats.health, 20.0);
        assert!(tower.tracking.is_none());
    }

    #[test]
    fn resolution_composes_global_and_local_range_mods() {
        let config = GameConfig::default();
        let mut tower = Tower::new(TowerKind::Basic, GridPos::new(0, 0), &config);
        let mut global = TowerStatModifiers::default();
        global.range.scale_by(1.5);
        tower.local_mods.range.scale_by(2.0);

        tower.resolve_stats(&config, &global);
        assert!((tower.stats.range - config.base_tower_range * 3.0).abs() < 1e-12);
    }

    #[test]
    fn damaged_tower_health_survives_resolution() {
        let config = GameConfig::default();
        let mut tower = Tower::new(TowerKind::Goal, GridPos::new(0, 0), &config);
        tower.stats.health = 3.0;
        tower.resolve_stats(&config, &TowerStatModifiers::default());
        assert_eq!(tower.stats.health, 3.0);
        assert_eq!(tower.stats.max_health, 20.0);
    }
}
