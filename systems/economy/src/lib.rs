#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Resource accounting and the upgrade economy.
//!
//! Covers the per-tick player update (cooldowns, memory accounting,
//! capacity resolution), kill payouts, and upgrade purchases priced along a
//! geometric cost-growth series.

use data_defence_core::{config::GameConfig, resolve_modified_stat, UpgradeKind};
use data_defence_world::minions::Minion;
use data_defence_world::player::{PlayerState, Upgrade};
use data_defence_world::Stage;
use tracing::debug;

/// Per-tick player bookkeeping: resolves the summon period and resource
/// capacities from their modifier stacks, recounts memory held by live
/// minions, and runs the summon cooldown.
pub fn update_player(stage: &Stage, player: &mut PlayerState, config: &GameConfig, dt: f64) {
    player.stats.summon_reload_time = resolve_modified_stat(
        config.base_player_summon_reload,
        &[player.global_mods.player.summon_reload],
    );

    player.resources.current_memory = memory_used(stage);
    player.resources.max_memory = resolve_modified_stat(
        config.base_player_max_memory,
        &[player.global_mods.player.max_memory],
    );
    player.resources.max_data = resolve_modified_stat(
        config.base_player_max_data,
        &[player.global_mods.player.max_data],
    );

    if player.stats.summon_reload > 0.0 {
        player.stats.summon_reload -= dt;
    }
}

/// Memory currently occupied by live minions.
#[must_use]
pub fn memory_used(stage: &Stage) -> f64 {
    stage
        .minions()
        .iter()
        .map(|(_, minion)| minion.stats.memory_usage)
        .sum()
}

/// Memory the next summon would occupy, after global modifiers.
#[must_use]
pub fn next_minion_memory_cost(player: &PlayerState, config: &GameConfig) -> f64 {
    resolve_modified_stat(
        config.base_minion_memory_usage,
        &[player.global_mods.minion.memory_usage],
    )
}

/// Data owed for killing the minion: its resolved per-tile gain times the
/// whole tiles it travelled.
#[must_use]
pub fn minion_payout(minion: &Minion) -> f64 {
    minion.stats.data_per_tile * minion.distance_travelled.floor()
}

/// Banks a data award, discarding any overflow past the resolved capacity.
pub fn award_data(player: &mut PlayerState, amount: f64) {
    let resources = &mut player.resources;
    resources.current_data = (resources.current_data + amount).min(resources.max_data);
}

/// Total cost of `count` sequential purchases starting from the upgrade's
/// current next cost `c` with growth coefficient `k`: the geometric sum
/// `c * (k^n - 1) / (k - 1)`, or `c * n` when `k = 1`.
#[must_use]
pub fn bulk_buy_cost(upgrade: &Upgrade, count: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let c = upgrade.next_cost;
    let k = upgrade.cost_coefficient;
    let n = f64::from(count);
    if k == 1.0 {
        c * n
    } else {
        c * (k.powf(n) - 1.0) / (k - 1.0)
    }
}

/// Largest purchase count whose bulk cost fits within `funds`.
///
/// The closed-form inversion of the geometric sum seeds the answer and the
/// result is nudged against [`bulk_buy_cost`] itself, so the boundary
/// `cost(n) <= funds < cost(n + 1)` holds exactly even when the logarithm
/// lands on the wrong side of an integer. Requires a growth coefficient of
/// at least 1; a shrinking cost series has no largest affordable count.
#[must_use]
pub fn max_affordable(upgrade: &Upgrade, funds: f64) -> u32 {
    debug_assert!(
        upgrade.cost_coefficient >= 1.0,
        "max_affordable requires a non-shrinking cost series"
    );
    if funds < upgrade.next_cost || upgrade.next_cost <= 0.0 {
        return 0;
    }

    let k = upgrade.cost_coefficient;
    let mut count = if k == 1.0 {
        (funds / upgrade.next_cost).floor() as u32
    } else {
        let argument = funds * (k - 1.0) / upgrade.next_cost + 1.0;
        (argument.ln() / k.ln()).floor().max(0.0) as u32
    };

    while bulk_buy_cost(upgrade, count.saturating_add(1)) <= funds {
        count = count.saturating_add(1);
    }
    while count > 0 && bulk_buy_cost(upgrade, count) > funds {
        count -= 1;
    }
    count
}

/// Buys `count` levels of the upgrade at once.
///
/// Atomic: either the deduction, the owned-count increment, the next-cost
/// growth, and the global-multiplier scaling all apply, or (on
/// insufficient funds) nothing changes and `false` is returned.
pub fn purchase(player: &mut PlayerState, kind: UpgradeKind, count: u32) -> bool {
    let cost = bulk_buy_cost(player.upgrades.get(kind), count);
    if player.resources.current_data < cost {
        return false;
    }
    if count == 0 {
        return true;
    }

    player.resources.current_data -= cost;

    let upgrade = player.upgrades.get_mut(kind);
    upgrade.owned += count;
    upgrade.next_cost *= upgrade.cost_coefficient.powi(count as i32);
    let boost = upgrade.multiplier_per_purchase.powi(count as i32);

    match kind {
        UpgradeKind::MaxData => player.global_mods.player.max_data.scale_by(boost),
        UpgradeKind::MaxMemory => player.global_mods.player.max_memory.scale_by(boost),
        UpgradeKind::MinionHealth => player.global_mods.minion.max_health.scale_by(boost),
        UpgradeKind::MinionSpeed => player.global_mods.minion.movement_speed.scale_by(boost),
    }

    debug!(?kind, count, cost, "upgrade purchased");
    true
}
