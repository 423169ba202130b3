//! Flat record of tunable base values consumed at initialization.
//!
//! Every `base_*` constant the stat-resolution passes read lives here.
//! Replacing the record mid-run re-resolves all scaling-value bases on the
//! next resolution pass without touching accumulated resources or upgrade
//! purchase counts.

use serde::{Deserialize, Serialize};

/// Base values for one purchasable upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeBases {
    /// Cost of the first purchase.
    pub cost: f64,
    /// Factor applied to the relevant global multiplier per purchase.
    pub multiplier: f64,
    /// Growth coefficient applied to the next cost per purchase.
    pub cost_coefficient: f64,
}

impl UpgradeBases {
    /// Creates a new upgrade base record.
    #[must_use]
    pub const fn new(cost: f64, multiplier: f64, cost_coefficient: f64) -> Self {
        Self {
            cost,
            multiplier,
            cost_coefficient,
        }
    }
}

/// Named numeric base values for every stat the simulation resolves.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds between player summons before modifiers apply.
    pub base_player_summon_reload: f64,
    /// Maximum data the player can bank before modifiers apply.
    pub base_player_max_data: f64,
    /// Maximum memory available for live minions before modifiers apply.
    pub base_player_max_memory: f64,
    /// Memory one minion occupies while alive.
    pub base_minion_memory_usage: f64,
    /// Minion maximum health.
    pub base_minion_health: f64,
    /// Minion movement speed in tiles per second.
    pub base_minion_movement_speed: f64,
    /// Seconds between minion attacks.
    pub base_minion_attack_speed: f64,
    /// Damage per minion attack.
    pub base_minion_attack_damage: f64,
    /// Distance from the goal tile at which a minion starts attacking.
    pub base_minion_attack_range: f64,
    /// Data awarded per whole tile the minion travelled, paid on its death.
    pub base_minion_data_per_tile: f64,
    /// Tower maximum health.
    pub base_tower_health: f64,
    /// Tower targeting radius in tiles.
    pub base_tower_range: f64,
    /// Damage per tower shot.
    pub base_tower_attack_damage: f64,
    /// Seconds between tower shots.
    pub base_tower_reload: f64,
    /// Seconds a laser trail lingers for the renderer.
    pub tower_laser_fadeout: f64,
    /// Base values for the max-data upgrade.
    pub max_data_upgrade: UpgradeBases,
    /// Base values for the max-memory upgrade.
    pub max_memory_upgrade: UpgradeBases,
    /// Base values for the minion-health upgrade.
    pub minion_health_upgrade: UpgradeBases,
    /// Base values for the minion-speed upgrade.
    pub minion_speed_upgrade: UpgradeBases,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_player_summon_reload: 1.0,
            base_player_max_data: 256.0,
            base_player_max_memory: 4.0,
            base_minion_memory_usage: 1.0,
            base_minion_health: 5.0,
            base_minion_movement_speed: 1.0,
            base_minion_attack_speed: 2.0,
            base_minion_attack_damage: 1.0,
            base_minion_attack_range: 0.1,
            base_minion_data_per_tile: 0.1,
            base_tower_health: 20.0,
            base_tower_range: 2.0,
            base_tower_attack_damage: 1.0,
            base_tower_reload: 1.0,
            tower_laser_fadeout: 1.0,
            max_data_upgrade: UpgradeBases::new(100.0, 1.05, 1.2),
            max_memory_upgrade: UpgradeBases::new(10.0, 1.2, 1.5),
            minion_health_upgrade: UpgradeBases::new(10.0, 1.2, 1.2),
            minion_speed_upgrade: UpgradeBases::new(10.0, 1.2, 1.2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = GameConfig::default();
        assert_eq!(config.base_player_max_data, 256.0);
        assert_eq!(config.base_minion_attack_speed, 2.0);
        assert_eq!(config.base_tower_health, 20.0);
        assert_eq!(config.max_memory_upgrade.cost_coefficient, 1.5);
    }

    #[test]
    fn config_round_trips_through_bincode() {
        let config = GameConfig {
            base_minion_health: 7.5,
            ..GameConfig::default()
        };
        let bytes = bincode::serialize(&config).expect("serialize");
        let restored: GameConfig = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, config);
    }
}
