//! Player-level state: summon cooldown, resources, global modifier stacks,
//! and the upgrade ledger.

use data_defence_core::{config::GameConfig, config::UpgradeBases, ScalingValue, UpgradeKind};

use crate::minions::MinionStatModifiers;
use crate::towers::TowerStatModifiers;

/// Everything owned by the player that persists across stages.
#[derive(Clone, Debug)]
pub struct PlayerState {
    /// Summon cooldown state.
    pub stats: PlayerStats,
    /// Data and memory pools.
    pub resources: ResourceState,
    /// Global modifier stacks, nested by the kind of entity they affect.
    pub global_mods: GlobalStatModifiers,
    /// Purchase state for every upgrade.
    pub upgrades: UpgradeLedger,
}

/// Player cooldown stats resolved each tick.
#[derive(Clone, Copy, Debug)]
pub struct PlayerStats {
    /// Seconds until the next summon is allowed.
    pub summon_reload: f64,
    /// Resolved seconds between summons.
    pub summon_reload_time: f64,
}

/// Data and memory pools with their resolved capacities.
#[derive(Clone, Copy, Debug)]
pub struct ResourceState {
    /// Data currently banked.
    pub current_data: f64,
    /// Resolved data capacity; overflow past it is discarded.
    pub max_data: f64,
    /// Memory occupied by live minions.
    pub current_memory: f64,
    /// Resolved memory capacity.
    pub max_memory: f64,
}

/// Global modifier stacks, grouped by target kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalStatModifiers {
    /// Modifiers affecting the player's own stats.
    pub player: PlayerStatModifiers,
    /// Modifiers affecting every minion.
    pub minion: MinionStatModifiers,
    /// Modifiers affecting every tower.
    pub tower: TowerStatModifiers,
}

/// Modifier stacks for player-level stats.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerStatModifiers {
    /// Modifier stack for the summon cooldown period.
    pub summon_reload: ScalingValue,
    /// Modifier stack for data capacity.
    pub max_data: ScalingValue,
    /// Modifier stack for memory capacity.
    pub max_memory: ScalingValue,
}

/// Mutable purchase state of one upgrade.
///
/// Created once at game start from config bases; mutated only by purchases
/// and never deleted. `next_cost` already includes the growth from every
/// prior purchase, so sequential single purchases and one bulk purchase of
/// the same count price identically.
#[derive(Clone, Copy, Debug)]
pub struct Upgrade {
    /// Cost of the next single purchase.
    pub next_cost: f64,
    /// Growth coefficient applied to `next_cost` per purchase.
    pub cost_coefficient: f64,
    /// Factor applied to the relevant global multiplier per purchase.
    pub multiplier_per_purchase: f64,
    /// Number of purchases made so far.
    pub owned: u32,
}

impl Upgrade {
    fn from_bases(bases: UpgradeBases) -> Self {
        Self {
            next_cost: bases.cost,
            cost_coefficient: bases.cost_coefficient,
            multiplier_per_purchase: bases.multiplier,
            owned: 0,
        }
    }
}

/// Purchase state for every upgrade the player can buy.
#[derive(Clone, Copy, Debug)]
pub struct UpgradeLedger {
    /// Data-capacity upgrade.
    pub max_data: Upgrade,
    /// Memory-capacity upgrade.
    pub max_memory: Upgrade,
    /// Minion maximum-health upgrade.
    pub minion_health: Upgrade,
    /// Minion movement-speed upgrade.
    pub minion_speed: Upgrade,
}

impl UpgradeLedger {
    /// The ledger entry for the given upgrade kind.
    #[must_use]
    pub const fn get(&self, kind: UpgradeKind) -> &Upgrade {
        match kind {
            UpgradeKind::MaxData => &self.max_data,
            UpgradeKind::MaxMemory => &self.max_memory,
            UpgradeKind::MinionHealth => &self.minion_health,
            UpgradeKind::MinionSpeed => &self.minion_speed,
        }
    }

    /// Mutable access to the ledger entry for the given upgrade kind.
    #[must_use]
    pub fn get_mut(&mut self, kind: UpgradeKind) -> &mut Upgrade {
        match kind {
            UpgradeKind::MaxData => &mut self.max_data,
            UpgradeKind::MaxMemory => &mut self.max_memory,
            UpgradeKind::MinionHealth => &mut self.minion_health,
            UpgradeKind::MinionSpeed => &mut self.minion_speed,
        }
    }
}

impl PlayerState {
    /// Creates the initial player state from config bases.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            stats: PlayerStats {
                summon_reload: 0.0,
                summon_reload_time: config.base_player_summon_reload,
            },
            resources: ResourceState {
                current_data: 0.0,
                max_data: config.base_player_max_data,
                current_memory: 0.0,
                max_memory: config.base_player_max_memory,
            },
            global_mods: GlobalStatModifiers::default(),
            upgrades: UpgradeLedger {
                max_data: Upgrade::from_bases(config.max_data_upgrade),
                max_memory: Upgrade::from_bases(config.max_memory_upgrade),
                minion_health: Upgrade::from_bases(config.minion_health_upgrade),
                minion_speed: Upgrade::from_bases(config.minion_speed_upgrade),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_starts_with_empty_pools_and_unit_mods() {
        let config = GameConfig::default();
        let player = PlayerState::new(&config);
        assert_eq!(player.resources.current_data, 0.0);
        assert_eq!(player.resources.max_data, 256.0);
        assert_eq!(player.stats.summon_reload, 0.0);
        assert_eq!(player.global_mods.player.max_data.resolve(), 1.0);
        assert_eq!(player.upgrades.max_memory.next_cost, 10.0);
        assert_eq!(player.upgrades.max_memory.owned, 0);
    }

    #[test]
    fn ledger_lookup_matches_upgrade_kinds() {
        let mut player = PlayerState::new(&GameConfig::default());
        player.upgrades.get_mut(UpgradeKind::MinionSpeed).owned = 3;
        assert_eq!(player.upgrades.get(UpgradeKind::MinionSpeed).owned, 3);
        assert_eq!(player.upgrades.get(UpgradeKind::MinionHealth).owned, 0);
    }
}
