#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Minion behavior state machine.
//!
//! Each tick, every minion re-resolves its stats, runs its current behavior
//! (marching along the flow field or attacking the goal structure), and is
//! destroyed if its health is spent or it has drifted a full tile outside
//! the map.

use data_defence_core::{config::GameConfig, MinionBehavior, TowerKind};
use data_defence_world::map::GameMap;
use data_defence_world::minions::{Minion, MinionStatModifiers};
use data_defence_world::player::PlayerState;
use data_defence_world::store::Arena;
use data_defence_world::towers::{Tower, TowerId};
use data_defence_world::{Stage, StageParts};
use tracing::{debug, info};

/// Updates every minion in the stage: stat resolution, behavior, removal.
///
/// Minions whose removal condition triggers are deleted from the store on
/// this same tick and take no further part in combat.
pub fn update_minions(stage: &mut Stage, player: &PlayerState, config: &GameConfig, dt: f64) {
    let StageParts {
        map,
        minions,
        towers,
        goal_tower,
        ..
    } = stage.parts_mut();

    for id in minions.keys() {
        let destroyed = {
            let Some(minion) = minions.get_mut(id) else {
                continue;
            };
            update_minion(
                minion,
                map,
                towers,
                goal_tower,
                &player.global_mods.minion,
                config,
                dt,
            )
        };
        if destroyed {
            let _ = minions.remove(id);
        }
    }
}

/// Runs one minion's tick and reports whether it should be destroyed.
fn update_minion(
    minion: &mut Minion,
    map: &mut GameMap,
    towers: &mut Arena<Tower>,
    goal_tower: Option<TowerId>,
    global: &MinionStatModifiers,
    config: &GameConfig,
    dt: f64,
) -> bool {
    minion.resolve_stats(config, global);

    match minion.behavior {
        MinionBehavior::Idle | MinionBehavior::Staging => {}
        MinionBehavior::Marching => {
            march(minion, map, dt);
            if map.goal().tile_rect().distance_to(minion.pos) < minion.stats.attack_range {
                minion.behavior = MinionBehavior::Attacking;
                minion.attack_target = goal_tower;
                debug!(pos = ?minion.pos, "minion reached the goal; attacking");
            }
        }
        MinionBehavior::Attacking => attack(minion, map, towers, dt),
    }

    !map.bounds().contains(minion.pos) || minion.stats.health <= 0.0
}

/// Integrates movement toward the current waypoint.
///
/// When the waypoint is reached mid-tick the leftover movement budget is
/// spent toward the following waypoint so cadence does not depend on how
/// tick boundaries line up with tile boundaries. Distance travelled only
/// accumulates outside the spawnable area.
fn march(minion: &mut Minion, map: &GameMap, dt: f64) {
    let Some(next) = minion.pathfinding.next_waypoint else {
        // Arrived (or stranded with no path); nothing to integrate.
        return;
    };

    let target = next.to_world() + minion.pathfinding.tile_offset;
    let to_target = target - minion.pos;
    let distance = to_target.length();
    let step = minion.stats.movement_speed * dt;

    let mut movement = to_target.normalize_or_zero() * step;
    if distance <= step {
        movement = to_target;
        let leftover = step - distance;

        minion.pathfinding.last_waypoint = Some(next.to_world());
        minion.pathfinding.next_waypoint = map.next_waypoint(target);

        if let Some(following) = minion.pathfinding.next_waypoint {
            let following_target = following.to_world() + minion.pathfinding.tile_offset;
            let direction = (following_target - target).normalize_or_zero();
            movement += direction * leftover;
        }
    }

    minion.pos += movement;
    if !map.spawnable_area().contains(minion.pos) {
        minion.distance_travelled += movement.length();
    }
}

/// Runs the attack cadence against the bound target.
fn attack(minion: &mut Minion, map: &mut GameMap, towers: &mut Arena<Tower>, dt: f64) {
    if minion.stats.reload > 0.0 {
        minion.stats.reload -= dt;
    }

    let Some(target_id) = minion.attack_target else {
        return;
    };
    if minion.stats.reload > 0.0 {
        return;
    }

    let alive = towers
        .get_mut(target_id)
        .filter(|target| target.stats.health > 0.0);
    let Some(target) = alive else {
        minion.behavior = MinionBehavior::Idle;
        return;
    };

    target.stats.health -= minion.stats.attack_damage;
    if target.stats.health <= 0.0 {
        let was_goal = target.kind == TowerKind::Goal;
        let _ = towers.remove(target_id);
        minion.attack_target = None;
        minion.behavior = MinionBehavior::Idle;

        if was_goal {
            map.mark_goal_destroyed();
            info!(map = map.id(), "goal tower destroyed");
        }
    }

    // Adding the period instead of resetting keeps the firing rate exact
    // across uneven tick intervals.
    minion.stats.reload += minion.stats.attack_speed;
}
