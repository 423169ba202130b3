#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick orchestration for the Data Defence engine.
//!
//! [`Game`] owns the configuration, the player, the buffered summon input,
//! and the current [`Stage`], and advances them one tick at a time in a
//! fixed order: buffered input, player cooldowns and resource accounting,
//! minions, laser-trail decay, the goal-destroyed countdown, towers. The
//! caller drives [`Game::advance`] once per frame and reads world state
//! only between calls; nothing inside the engine runs on its own clock.
//!
//! Towers deliberately act after minions each tick, so a minion that
//! reaches the goal on a tick cannot also be shot out of the store before
//! it starts attacking.

use std::time::Duration;

use data_defence_core::{config::GameConfig, DVec2, UpgradeKind};
use data_defence_system_economy as economy;
use data_defence_system_minion_behavior::update_minions;
use data_defence_system_tower_behavior::update_towers;
use data_defence_world::effects::decay_laser_trails;
use data_defence_world::map::MapError;
use data_defence_world::player::PlayerState;
use data_defence_world::Stage;
use thiserror::Error;
use tracing::{debug, error, info};

pub mod maps;

/// Viewport the engine assumes when the embedder does not supply one.
pub const DEFAULT_VIEWPORT: DVec2 = DVec2::new(960.0, 720.0);

/// Errors that prevent a game from starting.
#[derive(Debug, Error)]
pub enum GameError {
    /// A map in the playlist failed to decode.
    #[error(transparent)]
    Map(#[from] MapError),
    /// The playlist named no maps at all.
    #[error("map playlist is empty")]
    EmptyPlaylist,
}

/// One named map text in the rotation.
#[derive(Clone, Debug)]
pub struct MapSource {
    /// Identifier the stage-advance logic keys on.
    pub id: String,
    /// Raw map text in the two-characters-per-tile encoding.
    pub text: String,
}

/// Ordered map rotation; the map after the last wraps back to the first.
#[derive(Clone, Debug)]
pub struct Playlist {
    maps: Vec<MapSource>,
}

impl Playlist {
    /// Builds a playlist from the provided maps.
    pub fn new(maps: Vec<MapSource>) -> Result<Self, GameError> {
        if maps.is_empty() {
            return Err(GameError::EmptyPlaylist);
        }
        Ok(Self { maps })
    }

    /// The built-in map rotation.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            maps: maps::BUILTIN
                .iter()
                .map(|map| MapSource {
                    id: map.id.to_owned(),
                    text: map.text.to_owned(),
                })
                .collect(),
        }
    }

    fn first(&self) -> &MapSource {
        &self.maps[0]
    }

    /// Map following the given one, wrapping at the end of the rotation.
    /// An unknown identifier restarts from the first entry.
    #[must_use]
    pub fn next_after(&self, id: &str) -> &MapSource {
        let current = self.maps.iter().position(|map| map.id == id);
        let next = current.map_or(0, |index| (index + 1) % self.maps.len());
        &self.maps[next]
    }
}

/// Outcome of one stage tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageStatus {
    /// The stage continues next tick.
    Running,
    /// The advance countdown expired; the next stage should load now.
    Cleared,
}

/// Fixed per-tick entry point a stage exposes to the orchestrator.
///
/// This replaces the original design's update delegate stored inside the
/// game state: the orchestrator calls one known method on the stage rather
/// than an injected closure.
pub trait StageRunner {
    /// Runs one simulation tick over the stage's entities.
    fn run_tick(&mut self, player: &mut PlayerState, config: &GameConfig, dt: f64) -> StageStatus;
}

impl StageRunner for Stage {
    fn run_tick(&mut self, player: &mut PlayerState, config: &GameConfig, dt: f64) -> StageStatus {
        self.accumulate_time(dt);

        update_minions(self, player, config, dt);
        decay_laser_trails(self.parts_mut().laser_trails, dt);

        if self.tick_goal_countdown(dt) {
            // Towers are skipped here; the orchestrator swaps the stage in
            // and runs the fresh stage's tower pass within the same tick.
            return StageStatus::Cleared;
        }

        update_towers(self, player, config, dt);
        StageStatus::Running
    }
}

#[derive(Debug, Default)]
struct InputBuffer {
    summon: Option<DVec2>,
}

/// The complete simulation context: configuration, player, input buffer,
/// map rotation, and the active stage.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    player: PlayerState,
    input: InputBuffer,
    playlist: Playlist,
    stage: Stage,
    viewport: DVec2,
}

impl Game {
    /// Builds a game over the playlist, validating every map up front so
    /// later stage advances cannot trip over malformed map data.
    pub fn new(
        config: GameConfig,
        playlist: Playlist,
        viewport: DVec2,
    ) -> Result<Self, GameError> {
        for map in &playlist.maps {
            let _ = Stage::load(&map.id, &map.text, &config, viewport)?;
        }

        let first = playlist.first();
        let stage = Stage::load(&first.id, &first.text, &config, viewport)?;
        Ok(Self {
            player: PlayerState::new(&config),
            input: InputBuffer::default(),
            config,
            playlist,
            stage,
            viewport,
        })
    }

    /// The active stage.
    #[must_use]
    pub const fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The player state.
    #[must_use]
    pub const fn player(&self) -> &PlayerState {
        &self.player
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Buffers a summon command aimed at a world-space position. At most
    /// one command is held; a newer one replaces an unconsumed older one.
    pub fn queue_summon(&mut self, at: DVec2) {
        self.input.summon = Some(at);
    }

    /// Replaces the configuration record. Stat bases re-resolve on the next
    /// resolution pass; accumulated resources and upgrade purchase counts
    /// are untouched.
    pub fn update_config(&mut self, config: GameConfig) {
        self.config = config;
    }

    /// Buys `count` levels of the given upgrade, if affordable.
    pub fn purchase_upgrade(&mut self, kind: UpgradeKind, count: u32) -> bool {
        economy::purchase(&mut self.player, kind, count)
    }

    /// Advances the simulation by the elapsed wall-clock delta.
    pub fn advance(&mut self, elapsed: Duration) {
        let dt = elapsed.as_secs_f64();

        self.handle_input();
        economy::update_player(&self.stage, &mut self.player, &self.config, dt);

        match self.stage.run_tick(&mut self.player, &self.config, dt) {
            StageStatus::Running => {}
            StageStatus::Cleared => self.load_next_stage(dt),
        }
    }

    /// Consumes the buffered summon command if the cooldown has expired and
    /// free memory covers the next minion.
    ///
    /// The command is only cleared inside the ready branch, so a summon
    /// buffered during the cooldown fires the moment the cooldown expires.
    /// A consumed command aimed outside the spawnable area is discarded.
    fn handle_input(&mut self) {
        let Some(at) = self.input.summon else {
            return;
        };

        let cost = economy::next_minion_memory_cost(&self.player, &self.config);
        let free = self.player.resources.max_memory - self.player.resources.current_memory;
        if self.player.stats.summon_reload > 0.0 || cost > free {
            return;
        }

        self.input.summon = None;
        if !self.stage.map().spawnable_area().contains(at) {
            return;
        }

        let _ = self.stage.summon_minion(at, &self.config);
        self.player.stats.summon_reload += self.player.stats.summon_reload_time;
        debug!(x = at.x, y = at.y, "minion summoned");
    }

    fn load_next_stage(&mut self, dt: f64) {
        let next = self.playlist.next_after(self.stage.map().id()).clone();
        match Stage::load(&next.id, &next.text, &self.config, self.viewport) {
            Ok(stage) => {
                info!(from = self.stage.map().id(), to = next.id.as_str(), "stage advanced");
                self.stage = stage;
                // The original ran its tower pass after swapping stages, so
                // the fresh stage's towers still act this tick.
                update_towers(&mut self.stage, &mut self.player, &self.config, dt);
            }
            // Unreachable for playlists validated in `new`; keep the stage.
            Err(map_error) => error!(%map_error, "next map failed to load"),
        }
    }
}
