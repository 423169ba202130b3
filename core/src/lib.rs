#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core vocabulary shared across the Data Defence engine.
//!
//! This crate defines the value types every other crate speaks in: grid
//! positions and their canonical reversible encoding, tile and tower kinds,
//! axis-aligned rectangles, and the scaling-value arithmetic that turns base
//! constants and multiplier stacks into effective stats. Everything here is
//! plain data with pure operations; the authoritative world state and the
//! behavior systems live in their own crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use glam::DVec2;

pub mod config;

/// Kinds of tiles a decoded map grid can contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Plain traversable terrain.
    Open,
    /// The tile hosting the goal structure; traversable.
    Goal,
    /// Impassable terrain that may additionally host a tower.
    Wall,
    /// Traversable terrain where the player may summon minions.
    Spawnable,
}

impl TileKind {
    /// Reports whether minions may path across this tile.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// Types of towers that can stand on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Ordinary tower that tracks and fires at minions.
    Basic,
    /// The goal structure. It can be attacked and destroyed but never fires.
    Goal,
}

/// Behavior states a minion moves through during its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MinionBehavior {
    /// Terminal no-op state entered after combat resolves.
    Idle,
    /// Reserved pre-march state; currently a no-op.
    Staging,
    /// Following the flow field toward the goal.
    Marching,
    /// In range of the goal structure and attacking it.
    Attacking,
}

/// Purchasable upgrades that scale a global stat multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Raises the player's maximum data capacity.
    MaxData,
    /// Raises the player's maximum memory capacity.
    MaxMemory,
    /// Raises every minion's maximum health.
    MinionHealth,
    /// Raises every minion's movement speed.
    MinionSpeed,
}

/// Integer tile coordinate identifying one cell of the map grid.
///
/// The `Display`/`FromStr` pair is the canonical textual key encoding:
/// `"x,y"`, collision-free and reversible for the full `i32` range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    x: i32,
    y: i32,
}

impl GridPos {
    /// Creates a new grid position from tile coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column index of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row index of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Grid position nearest to a continuous world-space point.
    ///
    /// World space is measured in tile units with integer coordinates at
    /// tile centers, so rounding each component yields the closest tile.
    #[must_use]
    pub fn from_world(point: DVec2) -> Self {
        Self {
            x: point.x.round() as i32,
            y: point.y.round() as i32,
        }
    }

    /// Continuous world-space point at the center of this tile.
    #[must_use]
    pub fn to_world(self) -> DVec2 {
        DVec2::new(f64::from(self.x), f64::from(self.y))
    }

    /// Unit rectangle covering this tile in world space.
    #[must_use]
    pub fn tile_rect(self) -> Rect {
        Rect::new(self.to_world() - DVec2::splat(0.5), DVec2::ONE)
    }

    /// The four orthogonally adjacent grid positions.
    #[must_use]
    pub fn orthogonal_neighbors(self) -> [Self; 4] {
        [
            Self::new(self.x - 1, self.y),
            Self::new(self.x + 1, self.y),
            Self::new(self.x, self.y - 1),
            Self::new(self.x, self.y + 1),
        ]
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for GridPos {
    type Err = ParseGridPosError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (x, y) = value
            .split_once(',')
            .ok_or_else(|| ParseGridPosError::new(value))?;
        let x = x
            .trim()
            .parse::<i32>()
            .map_err(|_| ParseGridPosError::new(value))?;
        let y = y
            .trim()
            .parse::<i32>()
            .map_err(|_| ParseGridPosError::new(value))?;
        Ok(Self::new(x, y))
    }
}

/// Error produced when a grid-position key fails to parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseGridPosError {
    input: String,
}

impl ParseGridPosError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
        }
    }
}

impl fmt::Display for ParseGridPosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid grid position key", self.input)
    }
}

impl std::error::Error for ParseGridPosError {}

/// Axis-aligned rectangle in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    min: DVec2,
    size: DVec2,
}

impl Rect {
    /// Constructs a rectangle from its minimum corner and size.
    #[must_use]
    pub const fn new(min: DVec2, size: DVec2) -> Self {
        Self { min, size }
    }

    /// Minimum corner of the rectangle.
    #[must_use]
    pub const fn min(&self) -> DVec2 {
        self.min
    }

    /// Extent of the rectangle along both axes.
    #[must_use]
    pub const fn size(&self) -> DVec2 {
        self.size
    }

    /// Maximum corner of the rectangle.
    #[must_use]
    pub fn max(&self) -> DVec2 {
        self.min + self.size
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: DVec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }

    /// Distance from a point to the nearest point on the rectangle.
    ///
    /// Returns zero for points inside the rectangle.
    #[must_use]
    pub fn distance_to(&self, point: DVec2) -> f64 {
        let max = self.max();
        let dx = (self.min.x - point.x).max(0.0).max(point.x - max.x);
        let dy = (self.min.y - point.y).max(0.0).max(point.y - max.y);
        DVec2::new(dx, dy).length()
    }
}

/// Base value paired with a stacking multiplier.
///
/// This is the sole mechanism behind permanent upgrades: purchases scale the
/// multiplier and never rewrite the base.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalingValue {
    base: f64,
    multiplier: f64,
}

impl ScalingValue {
    /// Creates a scaling value with an explicit base and multiplier.
    #[must_use]
    pub const fn new(base: f64, multiplier: f64) -> Self {
        Self { base, multiplier }
    }

    /// Creates a scaling value with the provided base and a unit multiplier.
    #[must_use]
    pub const fn of(base: f64) -> Self {
        Self::new(base, 1.0)
    }

    /// The neutral modifier stack: base 1, multiplier 1.
    #[must_use]
    pub const fn unit() -> Self {
        Self::new(1.0, 1.0)
    }

    /// Base component of the value.
    #[must_use]
    pub const fn base(&self) -> f64 {
        self.base
    }

    /// Multiplier component of the value.
    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Effective value: `base * multiplier`. Pure and idempotent.
    #[must_use]
    pub fn resolve(&self) -> f64 {
        self.base * self.multiplier
    }

    /// Scales the multiplier in place, leaving the base untouched.
    pub fn scale_by(&mut self, factor: f64) {
        self.multiplier *= factor;
    }
}

impl Default for ScalingValue {
    fn default() -> Self {
        Self::unit()
    }
}

/// Composes a fixed base constant with an ordered sequence of modifier
/// stacks by multiplying every resolved stack into the base once.
#[must_use]
pub fn resolve_modified_stat(base: f64, stacks: &[ScalingValue]) -> f64 {
    stacks
        .iter()
        .fold(base, |value, stack| value * stack.resolve())
}
