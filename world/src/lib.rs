#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Data Defence engine.
//!
//! A [`Stage`] owns one playthrough's world: the decoded map with its
//! precomputed navigation fields, the minion/tower/laser-trail stores, and
//! the stage-advance countdown. Behavior systems receive `&mut` access
//! through [`Stage::parts_mut`] and mutate state in place; there is no
//! command queue and no shared global instance — whoever owns the stage
//! owns all of it for the duration of a tick.

use data_defence_core::{config::GameConfig, DVec2};
use tracing::info;

pub mod effects;
pub mod map;
pub mod minions;
pub mod navigation;
pub mod player;
pub mod store;
pub mod towers;

use effects::LaserTrail;
use map::{GameMap, MapError};
use minions::{Minion, MinionId};
use store::Arena;
use towers::{Tower, TowerId};

/// Seconds between the goal tower falling and the next stage loading.
const ADVANCE_COUNTDOWN: f64 = 1.0;

/// One playthrough's world state.
#[derive(Debug)]
pub struct Stage {
    map: GameMap,
    minions: Arena<Minion>,
    towers: Arena<Tower>,
    laser_trails: Arena<LaserTrail>,
    goal_tower: Option<TowerId>,
    advance_timer: f64,
    elapsed: f64,
    cleared_at: Option<f64>,
}

impl Stage {
    /// Decodes the map text and builds a fresh stage around it.
    ///
    /// Towers encoded in the map metadata are inserted into the tower store
    /// and the goal tower's identifier is recorded for minions to target.
    pub fn load(
        id: &str,
        text: &str,
        config: &GameConfig,
        viewport: DVec2,
    ) -> Result<Self, MapError> {
        let decoded = map::decode(id, text, config, viewport)?;

        let mut towers = Arena::new();
        let mut goal_tower = None;
        for tower in decoded.towers {
            let is_goal = tower.kind == data_defence_core::TowerKind::Goal;
            let key = towers.insert(tower);
            if is_goal {
                goal_tower = Some(key);
            }
        }

        info!(
            map = id,
            columns = decoded.map.columns(),
            rows = decoded.map.rows(),
            towers = towers.len(),
            "stage loaded"
        );

        Ok(Self {
            map: decoded.map,
            minions: Arena::new(),
            towers,
            laser_trails: Arena::new(),
            goal_tower,
            advance_timer: ADVANCE_COUNTDOWN,
            elapsed: 0.0,
            cleared_at: None,
        })
    }

    /// The stage's map.
    #[must_use]
    pub const fn map(&self) -> &GameMap {
        &self.map
    }

    /// Read access to the minion store.
    #[must_use]
    pub const fn minions(&self) -> &Arena<Minion> {
        &self.minions
    }

    /// Read access to the tower store.
    #[must_use]
    pub const fn towers(&self) -> &Arena<Tower> {
        &self.towers
    }

    /// Read access to the laser-trail store.
    #[must_use]
    pub const fn laser_trails(&self) -> &Arena<LaserTrail> {
        &self.laser_trails
    }

    /// Identifier of the goal tower, while it stands.
    #[must_use]
    pub const fn goal_tower(&self) -> Option<TowerId> {
        self.goal_tower
    }

    /// Simulated seconds this stage has run.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Simulated second at which the goal fell, once it has.
    #[must_use]
    pub const fn cleared_at(&self) -> Option<f64> {
        self.cleared_at
    }

    /// Advances the stage clock.
    pub fn accumulate_time(&mut self, dt: f64) {
        self.elapsed += dt;
    }

    /// Inserts a freshly summoned minion and wires its waypoints: the spawn
    /// point becomes its last waypoint and the flow field supplies the next.
    pub fn summon_minion(&mut self, at: DVec2, config: &GameConfig) -> MinionId {
        let mut minion = Minion::summon(at, config);
        minion.pathfinding.last_waypoint = Some(at);
        minion.pathfinding.next_waypoint = self.map.next_waypoint(at);
        self.minions.insert(minion)
    }

    /// Runs the goal-destroyed countdown. Returns `true` exactly once, on
    /// the tick the countdown expires and the next stage should load.
    pub fn tick_goal_countdown(&mut self, dt: f64) -> bool {
        if !self.map.goal_destroyed() {
            return false;
        }
        if self.cleared_at.is_none() {
            self.cleared_at = Some(self.elapsed);
        }
        self.advance_timer -= dt;
        self.advance_timer <= 0.0
    }

    /// Splits the stage into independently borrowable parts so behavior
    /// systems can mutate one store while reading or mutating another.
    #[must_use]
    pub fn parts_mut(&mut self) -> StageParts<'_> {
        StageParts {
            map: &mut self.map,
            minions: &mut self.minions,
            towers: &mut self.towers,
            laser_trails: &mut self.laser_trails,
            goal_tower: self.goal_tower,
        }
    }
}

/// Mutable views over a stage's independently borrowable parts.
#[derive(Debug)]
pub struct StageParts<'a> {
    /// The stage's map; mutable only for the goal-destroyed flag.
    pub map: &'a mut GameMap,
    /// The minion store.
    pub minions: &'a mut Arena<Minion>,
    /// The tower store.
    pub towers: &'a mut Arena<Tower>,
    /// The laser-trail store.
    pub laser_trails: &'a mut Arena<LaserTrail>,
    /// Identifier of the goal tower as of the start of the borrow.
    pub goal_tower: Option<TowerId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_defence_core::{GridPos, TowerKind};

    const VIEWPORT: DVec2 = DVec2::new(960.0, 720.0);

    fn stage() -> Stage {
        let config = GameConfig::default();
        Stage::load("test", "30002110\n", &config, VIEWPORT).expect("stage loads")
    }

    #[test]
    fn load_records_the_goal_tower() {
        let stage = stage();
        let goal_id = stage.goal_tower().expect("goal tower exists");
        let goal = stage.towers().get(goal_id).expect("goal tower resolves");
        assert_eq!(goal.kind, TowerKind::Goal);
        assert_eq!(goal.pos, stage.map().goal());
        assert_eq!(stage.towers().len(), 2);
        assert!(stage.minions().is_empty());
    }

    #[test]
    fn summoned_minions_get_waypoints_from_the_flow_field() {
        let config = GameConfig::default();
        let mut stage =
            Stage::load("test", "30001000\n", &config, VIEWPORT).expect("stage loads");
        let at = DVec2::new(0.1, 0.0);
        let id = stage.summon_minion(at, &config);

        let minion = stage.minions().get(id).expect("minion resolves");
        assert_eq!(minion.pathfinding.last_waypoint, Some(at));
        assert_eq!(minion.pathfinding.next_waypoint, Some(GridPos::new(1, 0)));
    }

    #[test]
    fn goal_countdown_only_runs_after_the_goal_falls() {
        let mut stage = stage();
        assert!(!stage.tick_goal_countdown(10.0));
        assert!(stage.cleared_at().is_none());

        stage.accumulate_time(2.5);
        stage.parts_mut().map.mark_goal_destroyed();
        assert!(!stage.tick_goal_countdown(0.4));
        assert_eq!(stage.cleared_at(), Some(2.5));
        assert!(!stage.tick_goal_countdown(0.4));
        assert!(stage.tick_goal_countdown(0.4));
    }
}
