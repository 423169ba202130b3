//! Minion entity state and per-minion stat resolution.

use data_defence_core::{
    config::GameConfig, resolve_modified_stat, DVec2, GridPos, MinionBehavior, ScalingValue,
};

use crate::store::Key;
use crate::towers::Tower;

/// Handle to a minion inside the stage's minion store.
pub type MinionId = Key<Minion>;

/// Fraction of the sub-tile spawn offset a minion keeps for its whole march.
/// Damping it slightly pulls lanes toward tile centers without stacking
/// every minion on the exact center.
const PATHFINDING_OFFSET_DECAY: f64 = 0.8;

/// A summoned unit marching toward the goal structure.
#[derive(Clone, Debug)]
pub struct Minion {
    /// Continuous world-space position.
    pub pos: DVec2,
    /// Current behavior state.
    pub behavior: MinionBehavior,
    /// Stats as of the latest resolution pass.
    pub stats: MinionStats,
    /// Per-minion modifier stacks applied after the player's global stacks.
    pub local_mods: MinionStatModifiers,
    /// Waypoint-following state.
    pub pathfinding: PathfindingState,
    /// Distance travelled outside the spawnable area, in tiles.
    pub distance_travelled: f64,
    /// Tower this minion is attacking, once it has reached the goal.
    pub attack_target: Option<Key<Tower>>,
}

/// Resolved minion stats. All fields except `health` and `reload` are
/// recomputed from config bases and modifier stacks every resolution pass.
#[derive(Clone, Copy, Debug)]
pub struct MinionStats {
    /// Remaining health. Never exceeds `max_health` after resolution.
    pub health: f64,
    /// Resolved maximum health.
    pub max_health: f64,
    /// Resolved memory this minion occupies while alive.
    pub memory_usage: f64,
    /// Resolved movement speed in tiles per second.
    pub movement_speed: f64,
    /// Resolved seconds between attacks.
    pub attack_speed: f64,
    /// Resolved damage per attack.
    pub attack_damage: f64,
    /// Resolved distance from the goal tile at which attacking starts.
    pub attack_range: f64,
    /// Seconds until the next attack may land.
    pub reload: f64,
    /// Resolved data awarded per whole tile travelled, paid on death.
    pub data_per_tile: f64,
}

/// One modifier stack per minion stat. Used both for the player's global
/// minion modifiers and for per-minion local modifiers.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinionStatModifiers {
    /// Modifier stack for memory usage.
    pub memory_usage: ScalingValue,
    /// Modifier stack for maximum health.
    pub max_health: ScalingValue,
    /// Modifier stack for movement speed.
    pub movement_speed: ScalingValue,
    /// Modifier stack for attack cadence.
    pub attack_speed: ScalingValue,
    /// Modifier stack for attack damage.
    pub attack_damage: ScalingValue,
    /// Modifier stack for attack range.
    pub attack_range: ScalingValue,
    /// Modifier stack for data gained per tile travelled.
    pub data_per_tile: ScalingValue,
}

/// Waypoint bookkeeping for one minion.
#[derive(Clone, Copy, Debug)]
pub struct PathfindingState {
    /// Fixed sub-tile offset carried from the spawn point, applied to every
    /// waypoint target so parallel minions do not overlap exactly.
    pub tile_offset: DVec2,
    /// World position of the waypoint most recently reached (or the spawn
    /// point before the first waypoint).
    pub last_waypoint: Option<DVec2>,
    /// Tile to march toward next; `None` once arrived or unreachable.
    pub next_waypoint: Option<GridPos>,
}

impl Minion {
    /// Creates a minion at the given spawn point with base stats.
    ///
    /// Waypoints are left unset; the stage wires them when it inserts the
    /// minion into its store.
    #[must_use]
    pub fn summon(at: DVec2, config: &GameConfig) -> Self {
        let tile_center = GridPos::from_world(at).to_world();
        let tile_offset = (at - tile_center) * PATHFINDING_OFFSET_DECAY;

        Self {
            pos: at,
            behavior: MinionBehavior::Marching,
            stats: MinionStats {
                health: config.base_minion_health,
                max_health: config.base_minion_health,
                memory_usage: config.base_minion_memory_usage,
                movement_speed: config.base_minion_movement_speed,
                attack_speed: config.base_minion_attack_speed,
                attack_damage: config.base_minion_attack_damage,
                attack_range: config.base_minion_attack_range,
                reload: 0.0,
                data_per_tile: config.base_minion_data_per_tile,
            },
            local_mods: MinionStatModifiers::default(),
            pathfinding: PathfindingState {
                tile_offset,
                last_waypoint: None,
                next_waypoint: None,
            },
            distance_travelled: 0.0,
            attack_target: None,
        }
    }

    /// Re-resolves every derived stat from config bases through the global
    /// and local modifier stacks, then clamps health to the new maximum.
    pub fn resolve_stats(&mut self, config: &GameConfig, global: &MinionStatModifiers) {
        self.stats.max_health = resolve_modified_stat(
            config.base_minion_health,
            &[global.max_health, self.local_mods.max_health],
        );
        self.stats.memory_usage = resolve_modified_stat(
            config.base_minion_memory_usage,
            &[global.memory_usage, self.local_mods.memory_usage],
        );
        self.stats.movement_speed = resolve_modified_stat(
            config.base_minion_movement_speed,
            &[global.movement_speed, self.local_mods.movement_speed],
        );
        self.stats.attack_speed = resolve_modified_stat(
            config.base_minion_attack_speed,
            &[global.attack_speed, self.local_mods.attack_speed],
        );
        self.stats.attack_damage = resolve_modified_stat(
            config.base_minion_attack_damage,
            &[global.attack_damage, self.local_mods.attack_damage],
        );
        self.stats.attack_range = resolve_modified_stat(
            config.base_minion_attack_range,
            &[global.attack_range, self.local_mods.attack_range],
        );
        self.stats.data_per_tile = resolve_modified_stat(
            config.base_minion_data_per_tile,
            &[global.data_per_tile, self.local_mods.data_per_tile],
        );

        self.stats.health = self.stats.health.min(self.stats.max_health);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summon_keeps_a_damped_sub_tile_offset() {
        let config = GameConfig::default();
        let minion = Minion::summon(DVec2::new(2.25, 3.0), &config);
        assert_eq!(minion.pos, DVec2::new(2.25, 3.0));
        assert_eq!(minion.pathfinding.tile_offset, DVec2::new(0.2, 0.0));
        assert_eq!(minion.behavior, MinionBehavior::Marching);
        assert_eq!(minion.stats.health, config.base_minion_health);
    }

    #[test]
    fn resolution_applies_global_then_local_stacks() {
        let config = GameConfig::default();
        let mut minion = Minion::summon(DVec2::ZERO, &config);
        let mut global = MinionStatModifiers::default();
        global.movement_speed.scale_by(2.0);
        minion.local_mods.movement_speed.scale_by(1.5);

        minion.resolve_stats(&config, &global);
        let expected = config.base_minion_movement_speed * 2.0 * 1.5;
        assert!((minion.stats.movement_speed - expected).abs() < 1e-12);
    }

    #[test]
    fn health_never_exceeds_resolved_max_health() {
        let config = GameConfig::default();
        let mut minion = Minion::summon(DVec2::ZERO, &config);
        let mut global = MinionStatModifiers::default();
        global.max_health.scale_by(2.0);
        minion.resolve_stats(&config, &global);
        assert_eq!(minion.stats.max_health, 10.0);
        assert_eq!(minion.stats.health, 5.0);

        // Shrinking the modifier clamps health down on the same pass.
        let weaker = MinionStatModifiers::default();
        minion.resolve_stats(&config, &weaker);
        assert_eq!(minion.stats.max_health, 5.0);
        assert_eq!(minion.stats.health, 5.0);

        minion.stats.health = 4.0;
        minion.resolve_stats(&config, &weaker);
        assert_eq!(minion.stats.health, 4.0);
    }
}
