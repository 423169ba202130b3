#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tower tracking and combat.
//!
//! Basic towers retain their tracked minion while it stays alive and in
//! range, otherwise they rescan for the minion closest to the goal by
//! pathfinding-progress score. Shots run on the same additive reload
//! cadence minions use, emit a laser trail for the renderer, and pay out
//! the victim's data award on a kill. Goal towers are passive.

use data_defence_core::{config::GameConfig, DVec2, TowerKind};
use data_defence_world::effects::LaserTrail;
use data_defence_world::map::GameMap;
use data_defence_world::minions::{Minion, MinionId};
use data_defence_world::navigation;
use data_defence_world::player::PlayerState;
use data_defence_world::store::Arena;
use data_defence_world::towers::Tower;
use data_defence_world::{Stage, StageParts};
use tracing::debug;

/// Updates every tower in the stage: stat resolution, tracking, combat.
pub fn update_towers(stage: &mut Stage, player: &mut PlayerState, config: &GameConfig, dt: f64) {
    let StageParts {
        map,
        minions,
        towers,
        laser_trails,
        ..
    } = stage.parts_mut();

    for id in towers.keys() {
        let Some(tower) = towers.get_mut(id) else {
            continue;
        };
        tower.resolve_stats(config, &player.global_mods.tower);
        if tower.kind != TowerKind::Basic {
            continue;
        }

        track_minion(tower, minions, map);
        fire(tower, minions, laser_trails, player, config, dt);
    }
}

/// Keeps or replaces the tower's tracked minion and updates its facing.
///
/// The current target is kept only while it still exists, has positive
/// health, and sits within resolved range; otherwise the store is rescanned
/// for the most progressed minion in range.
fn track_minion(tower: &mut Tower, minions: &Arena<Minion>, map: &GameMap) {
    let mut rescan = true;

    if let Some(tracked) = tower.tracking {
        if let Some(minion) = minions
            .get(tracked)
            .filter(|minion| minion.stats.health > 0.0)
        {
            let offset = minion.pos - tower.pos.to_world();
            if offset.length() <= tower.stats.range {
                tower.facing = offset.y.atan2(offset.x);
                rescan = false;
            } else {
                tower.tracking = None;
            }
        }
    }

    if rescan {
        tower.tracking =
            most_progressed_minion_in_range(minions, map, tower.pos.to_world(), tower.stats.range);
    }
}

/// Minion within `range` of `center` with the lowest pathfinding-progress
/// score, i.e. the one closest to the goal. Ties keep the first minion
/// encountered in store order.
#[must_use]
pub fn most_progressed_minion_in_range(
    minions: &Arena<Minion>,
    map: &GameMap,
    center: DVec2,
    range: f64,
) -> Option<MinionId> {
    let mut best: Option<(MinionId, f64)> = None;

    for (id, minion) in minions.iter() {
        if (minion.pos - center).length() > range {
            continue;
        }
        let progress = navigation::pathfinding_progress(minion, map);
        best = match best {
            Some((_, best_progress)) if progress < best_progress => Some((id, progress)),
            Some(existing) => Some(existing),
            None => Some((id, progress)),
        };
    }

    best.map(|(id, _)| id)
}

/// Runs the firing cadence against the tracked minion.
fn fire(
    tower: &mut Tower,
    minions: &mut Arena<Minion>,
    laser_trails: &mut Arena<LaserTrail>,
    player: &mut PlayerState,
    config: &GameConfig,
    dt: f64,
) {
    if tower.stats.reload > 0.0 {
        tower.stats.reload -= dt;
    }

    let Some(target_id) = tower.tracking else {
        return;
    };
    if tower.stats.reload > 0.0 {
        return;
    }
    let Some(minion) = minions.get_mut(target_id) else {
        tower.tracking = None;
        return;
    };

    minion.stats.health -= tower.stats.attack_damage;
    let _ = laser_trails.insert(LaserTrail::new(
        tower.pos.to_world(),
        minion.pos,
        config.tower_laser_fadeout,
    ));

    if minion.stats.health <= 0.0 {
        let payout = data_defence_system_economy::minion_payout(minion);
        let _ = minions.remove(target_id);
        data_defence_system_economy::award_data(player, payout);
        tower.tracking = None;
        debug!(payout, "tower kill");
    }

    // Additive reload keeps the firing rate independent of tick size.
    tower.stats.reload += tower.stats.reload_time;
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_defence_core::GridPos;

    const VIEWPORT: DVec2 = DVec2::new(960.0, 720.0);

    /// Spawn on the left, a hosted wall tower at (3,0), goal at (6,0); the
    /// open second row routes the lane around the wall.
    const TOWER_LANE: &str = "30000021000010\n00000000000000";

    fn lane_stage(config: &GameConfig) -> Stage {
        Stage::load("lane", TOWER_LANE, config, VIEWPORT).expect("stage loads")
    }

    fn basic_tower_id(stage: &Stage) -> data_defence_world::towers::TowerId {
        stage
            .towers()
            .find(|tower| tower.kind == TowerKind::Basic)
            .expect("basic tower exists")
    }

    #[test]
    fn goal_towers_never_track_or_fire() {
        let config = GameConfig::default();
        let mut player = PlayerState::new(&config);
        let mut stage = lane_stage(&config);
        let goal_id = stage.goal_tower().expect("goal tower exists");

        // Park a minion right next to the goal tower.
        let id = stage.summon_minion(DVec2::new(0.2, 0.0), &config);
        stage
            .parts_mut()
            .minions
            .get_mut(id)
            .expect("minion resolves")
            .pos = DVec2::new(6.0, 0.0);

        update_towers(&mut stage, &mut player, &config, 1.0);

        let goal = stage.towers().get(goal_id).expect("goal stands");
        assert_eq!(goal.tracking, None);
        let minion = stage.minions().get(id).expect("minion untouched");
        assert_eq!(minion.stats.health, config.base_minion_health);
    }

    #[test]
    fn towers_keep_a_live_target_and_face_it() {
        let config = GameConfig::default();
        let mut player = PlayerState::new(&config);
        let mut stage = lane_stage(&config);
        let tower_id = basic_tower_id(&stage);

        let near = stage.summon_minion(DVec2::new(0.2, 0.0), &config);
        {
            let parts = stage.parts_mut();
            parts.minions.get_mut(near).expect("minion resolves").pos = DVec2::new(2.0, 0.0);
        }
        update_towers(&mut stage, &mut player, &config, 0.1);
        assert_eq!(
            stage.towers().get(tower_id).expect("tower stands").tracking,
            Some(near)
        );

        // A later minion that is more progressed does not steal the lock
        // while the current target stays valid.
        let closer = stage.summon_minion(DVec2::new(0.4, 0.0), &config);
        {
            let parts = stage.parts_mut();
            parts.minions.get_mut(closer).expect("minion resolves").pos = DVec2::new(4.0, 0.0);
        }
        update_towers(&mut stage, &mut player, &config, 0.1);
        let tower = stage.towers().get(tower_id).expect("tower stands");
        assert_eq!(tower.tracking, Some(near));

        // Facing points from the tower at (3,0) back toward (2,0).
        assert!((tower.facing - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn rescan_picks_the_minion_closest_to_the_goal() {
        let config = GameConfig::default();
        let mut player = PlayerState::new(&config);
        let mut stage = lane_stage(&config);
        let tower_id = basic_tower_id(&stage);

        let trailing = stage.summon_minion(DVec2::new(0.2, 0.0), &config);
        let leading = stage.summon_minion(DVec2::new(0.4, 0.0), &config);
        {
            let parts = stage.parts_mut();
            let back = parts.minions.get_mut(trailing).expect("minion resolves");
            back.pos = DVec2::new(2.0, 0.0);
            back.pathfinding.last_waypoint = Some(DVec2::new(1.0, 0.0));
            back.pathfinding.next_waypoint = Some(GridPos::new(2, 1));
            let front = parts.minions.get_mut(leading).expect("minion resolves");
            front.pos = DVec2::new(4.0, 0.0);
            front.pathfinding.last_waypoint = Some(DVec2::new(4.0, 0.0));
            front.pathfinding.next_waypoint = Some(GridPos::new(5, 0));
        }

        update_towers(&mut stage, &mut player, &config, 0.1);
        assert_eq!(
            stage.towers().get(tower_id).expect("tower stands").tracking,
            Some(leading)
        );
    }

    #[test]
    fn out_of_range_targets_are_dropped_and_replaced() {
        let config = GameConfig::default();
        let mut player = PlayerState::new(&config);
        let mut stage = lane_stage(&config);
        let tower_id = basic_tower_id(&stage);

        let first = stage.summon_minion(DVec2::new(0.2, 0.0), &config);
        {
            let parts = stage.parts_mut();
            parts.minions.get_mut(first).expect("minion resolves").pos = DVec2::new(2.0, 0.0);
        }
        update_towers(&mut stage, &mut player, &config, 0.1);
        assert_eq!(
            stage.towers().get(tower_id).expect("tower stands").tracking,
            Some(first)
        );

        let second = stage.summon_minion(DVec2::new(0.4, 0.0), &config);
        {
            let parts = stage.parts_mut();
            parts.minions.get_mut(first).expect("minion resolves").pos = DVec2::new(8.0, 0.0);
            parts.minions.get_mut(second).expect("minion resolves").pos = DVec2::new(4.0, 0.0);
        }
        update_towers(&mut stage, &mut player, &config, 0.1);
        assert_eq!(
            stage.towers().get(tower_id).expect("tower stands").tracking,
            Some(second)
        );
    }
}
