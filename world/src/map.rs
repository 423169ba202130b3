//! Map text decoding and the immutable-after-load [`GameMap`] aggregate.
//!
//! Maps arrive as a textual grid, two characters per tile: the first digit
//! selects the tile kind (`0` open, `1` goal, `2` wall, `3` spawnable;
//! anything else decodes as open), the second is auxiliary metadata. The
//! only metadata currently honored is `1` on a wall tile, which places a
//! basic tower there; goal tiles always receive the goal tower regardless
//! of their metadata.

use std::collections::HashMap;

use data_defence_core::{config::GameConfig, DVec2, GridPos, Rect, TileKind, TowerKind};
use thiserror::Error;

use crate::navigation::{self, NavigationFields};
use crate::towers::Tower;

/// Errors that abort a map load. The engine never enters a stage with
/// invalid map data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// The map text contained no rows.
    #[error("map '{0}' has no rows")]
    Empty(String),
    /// A row's length differed from the first row's length.
    #[error("map '{id}' row {row} has a different length than row 0")]
    RaggedRow {
        /// Identifier of the offending map.
        id: String,
        /// Zero-based index of the offending row.
        row: usize,
    },
    /// A row's length was not a multiple of the two-character tile encoding.
    #[error("map '{id}' row 0 is {len} characters, not an even number")]
    OddRowWidth {
        /// Identifier of the offending map.
        id: String,
        /// Character length of the first row.
        len: usize,
    },
    /// The grid contained no goal tile.
    #[error("map '{0}' has no goal tile")]
    MissingGoal(String),
    /// The grid contained more than one goal tile.
    #[error("map '{0}' has more than one goal tile")]
    DuplicateGoal(String),
    /// The grid contained no spawnable tile.
    #[error("map '{0}' has no spawnable tiles")]
    MissingSpawnable(String),
}

/// A decoded map together with the towers its metadata placed.
#[derive(Debug, PartialEq)]
pub(crate) struct DecodedMap {
    pub(crate) map: GameMap,
    pub(crate) towers: Vec<Tower>,
}

pub(crate) fn decode(
    id: &str,
    text: &str,
    config: &GameConfig,
    viewport: DVec2,
) -> Result<DecodedMap, MapError> {
    let rows: Vec<&str> = text.trim().lines().collect();
    if rows.is_empty() || rows[0].is_empty() {
        return Err(MapError::Empty(id.to_owned()));
    }

    let width = rows[0].chars().count();
    if width % CHARS_PER_TILE != 0 {
        return Err(MapError::OddRowWidth {
            id: id.to_owned(),
            len: width,
        });
    }

    let columns = (width / CHARS_PER_TILE) as u32;
    let row_count = rows.len() as u32;

    let mut tiles = HashMap::new();
    let mut towers = Vec::new();
    let mut goal = None;

    for (y, row) in rows.iter().enumerate() {
        let chars: Vec<char> = row.chars().collect();
        if chars.len() != width {
            return Err(MapError::RaggedRow {
                id: id.to_owned(),
                row: y,
            });
        }

        for x in 0..columns as usize {
            let kind = tile_kind_from(chars[x * CHARS_PER_TILE]);
            let metadata = chars[x * CHARS_PER_TILE + 1];
            let pos = GridPos::new(x as i32, y as i32);

            match kind {
                TileKind::Wall if metadata == '1' => {
                    towers.push(Tower::new(TowerKind::Basic, pos, config));
                }
                TileKind::Goal => {
                    if goal.is_some() {
                        return Err(MapError::DuplicateGoal(id.to_owned()));
                    }
                    goal = Some(pos);
                    towers.push(Tower::new(TowerKind::Goal, pos, config));
                }
                _ => {}
            }

            let _ = tiles.insert(pos, kind);
        }
    }

    let goal = goal.ok_or_else(|| MapError::MissingGoal(id.to_owned()))?;
    let fields = navigation::compute_fields(&tiles, goal, columns, row_count);
    let spawnable_area = navigation::compute_spawnable_area(&tiles, columns, row_count)
        .ok_or_else(|| MapError::MissingSpawnable(id.to_owned()))?;

    let map = GameMap {
        id: id.to_owned(),
        tiles,
        columns,
        rows: row_count,
        tile_size: viewport / DVec2::new(f64::from(columns), f64::from(row_count)),
        goal,
        goal_destroyed: false,
        fields,
        spawnable_area,
    };

    Ok(DecodedMap { map, towers })
}

const CHARS_PER_TILE: usize = 2;

fn tile_kind_from(code: char) -> TileKind {
    match code {
        '1' => TileKind::Goal,
        '2' => TileKind::Wall,
        '3' => TileKind::Spawnable,
        _ => TileKind::Open,
    }
}

/// Immutable-after-load map aggregate: the tile grid, the precomputed
/// navigation fields, the spawnable-area rectangle, and the goal.
///
/// The only mutation a loaded map admits is [`GameMap::mark_goal_destroyed`].
#[derive(Clone, Debug, PartialEq)]
pub struct GameMap {
    id: String,
    tiles: HashMap<GridPos, TileKind>,
    columns: u32,
    rows: u32,
    tile_size: DVec2,
    goal: GridPos,
    goal_destroyed: bool,
    fields: NavigationFields,
    spawnable_area: Rect,
}

impl GameMap {
    /// Identifier used to select the next map when this stage completes.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of tile columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Pixel dimensions of one tile, for the renderer's benefit.
    #[must_use]
    pub const fn tile_size(&self) -> DVec2 {
        self.tile_size
    }

    /// Position of the goal tile.
    #[must_use]
    pub const fn goal(&self) -> GridPos {
        self.goal
    }

    /// Whether the goal tower on this map has been destroyed.
    #[must_use]
    pub const fn goal_destroyed(&self) -> bool {
        self.goal_destroyed
    }

    /// Records that the goal tower fell. Irreversible for this stage.
    pub fn mark_goal_destroyed(&mut self) {
        self.goal_destroyed = true;
    }

    /// Kind of the tile at the given position, if inside the grid.
    #[must_use]
    pub fn tile(&self, pos: GridPos) -> Option<TileKind> {
        self.tiles.get(&pos).copied()
    }

    /// Next tile to step toward on the shortest path to the goal.
    ///
    /// `None` means the tile is the goal itself or has no path.
    #[must_use]
    pub fn flow_next(&self, pos: GridPos) -> Option<GridPos> {
        self.fields.flow.get(&pos).copied().flatten()
    }

    /// Hop count from the given tile to the goal, if reachable.
    #[must_use]
    pub fn distance(&self, pos: GridPos) -> Option<u32> {
        self.fields.distance.get(&pos).copied()
    }

    /// Waypoint to march toward from a continuous world position: the flow
    /// entry of the nearest tile.
    #[must_use]
    pub fn next_waypoint(&self, from: DVec2) -> Option<GridPos> {
        self.flow_next(GridPos::from_world(from))
    }

    /// Bounding rectangle of the contiguous spawnable region.
    #[must_use]
    pub const fn spawnable_area(&self) -> Rect {
        self.spawnable_area
    }

    /// Map rectangle inflated by one tile in every direction. Minions
    /// outside this rectangle are destroyed.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(
            DVec2::splat(-1.0),
            DVec2::new(f64::from(self.columns) + 2.0, f64::from(self.rows) + 2.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: DVec2 = DVec2::new(960.0, 720.0);

    fn decode_map(text: &str) -> Result<DecodedMap, MapError> {
        decode("test", text, &GameConfig::default(), VIEWPORT)
    }

    #[test]
    fn decodes_tiles_towers_and_goal() {
        let decoded = decode_map("30002110\n30200000\n").expect("map decodes");
        let map = &decoded.map;

        assert_eq!(map.columns(), 4);
        assert_eq!(map.rows(), 2);
        assert_eq!(map.goal(), GridPos::new(3, 0));
        assert_eq!(map.tile(GridPos::new(0, 0)), Some(TileKind::Spawnable));
        assert_eq!(map.tile(GridPos::new(2, 0)), Some(TileKind::Wall));
        assert_eq!(map.tile(GridPos::new(1, 1)), Some(TileKind::Wall));

        // Wall metadata '1' places a basic tower; the goal always gets the
        // goal tower. The plain wall at (1,1) hosts nothing.
        assert_eq!(decoded.towers.len(), 2);
        assert!(decoded
            .towers
            .iter()
            .any(|tower| tower.kind == TowerKind::Basic && tower.pos == GridPos::new(2, 0)));
        assert!(decoded
            .towers
            .iter()
            .any(|tower| tower.kind == TowerKind::Goal && tower.pos == GridPos::new(3, 0)));
    }

    #[test]
    fn unknown_tile_digits_decode_as_open() {
        let decoded = decode_map("309010\n").expect("map decodes");
        assert_eq!(decoded.map.tile(GridPos::new(1, 0)), Some(TileKind::Open));
    }

    #[test]
    fn goal_metadata_is_ignored() {
        let decoded = decode_map("301700\n").expect("map decodes");
        assert_eq!(decoded.map.goal(), GridPos::new(1, 0));
        assert_eq!(decoded.towers.len(), 1);
        assert_eq!(decoded.towers[0].kind, TowerKind::Goal);
    }

    #[test]
    fn missing_goal_is_fatal() {
        assert_eq!(
            decode_map("3000\n"),
            Err(MapError::MissingGoal("test".to_owned()))
        );
    }

    #[test]
    fn duplicate_goal_is_fatal() {
        assert_eq!(
            decode_map("301010\n"),
            Err(MapError::DuplicateGoal("test".to_owned()))
        );
    }

    #[test]
    fn missing_spawnable_is_fatal() {
        assert_eq!(
            decode_map("0010\n"),
            Err(MapError::MissingSpawnable("test".to_owned()))
        );
    }

    #[test]
    fn ragged_rows_are_fatal() {
        assert_eq!(
            decode_map("3010\n30\n"),
            Err(MapError::RaggedRow {
                id: "test".to_owned(),
                row: 1
            })
        );
    }

    #[test]
    fn odd_row_width_is_fatal() {
        assert_eq!(
            decode_map("30100\n"),
            Err(MapError::OddRowWidth {
                id: "test".to_owned(),
                len: 5
            })
        );
    }

    #[test]
    fn empty_text_is_fatal() {
        assert_eq!(decode_map("  \n \n"), Err(MapError::Empty("test".to_owned())));
    }

    #[test]
    fn navigation_fields_cover_the_reachable_region() {
        let decoded = decode_map("30001000\n").expect("map decodes");
        let map = &decoded.map;
        assert_eq!(map.distance(map.goal()), Some(0));
        assert_eq!(map.flow_next(map.goal()), None);
        assert_eq!(map.distance(GridPos::new(0, 0)), Some(2));
        assert_eq!(map.flow_next(GridPos::new(0, 0)), Some(GridPos::new(1, 0)));
        assert_eq!(
            map.next_waypoint(DVec2::new(0.2, -0.1)),
            Some(GridPos::new(1, 0))
        );
    }

    #[test]
    fn tile_size_divides_the_viewport() {
        let decoded = decode_map("30001000\n30000000\n").expect("map decodes");
        assert_eq!(decoded.map.tile_size(), DVec2::new(240.0, 360.0));
    }

    #[test]
    fn bounds_inflate_the_grid_by_one_tile() {
        let decoded = decode_map("301000\n").expect("map decodes");
        let bounds = decoded.map.bounds();
        assert_eq!(bounds.min(), DVec2::new(-1.0, -1.0));
        assert_eq!(bounds.max(), DVec2::new(4.0, 2.0));
        assert!(bounds.contains(DVec2::new(3.6, 1.2)));
        assert!(!bounds.contains(DVec2::new(4.5, 0.0)));
    }
}
