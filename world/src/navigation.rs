//! Flow- and distance-field solver plus waypoint progress scoring.
//!
//! Both fields come from one breadth-first flood fill seeded at the goal
//! tile, expanding a FIFO frontier over 4-connected non-wall neighbors.
//! Tiles the fill never reaches are absent from both maps; callers treat
//! absence as "no path".

use std::collections::{HashMap, HashSet, VecDeque};

use data_defence_core::{DVec2, GridPos, Rect, TileKind};

use crate::map::GameMap;
use crate::minions::Minion;

/// Next-hop and hop-count fields covering the region reachable from the goal.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct NavigationFields {
    /// Tile -> tile to step toward on the shortest path to the goal.
    /// The goal itself maps to `None`.
    pub(crate) flow: HashMap<GridPos, Option<GridPos>>,
    /// Tile -> hop count from the goal along the flow field.
    pub(crate) distance: HashMap<GridPos, u32>,
}

pub(crate) fn compute_fields(
    tiles: &HashMap<GridPos, TileKind>,
    goal: GridPos,
    columns: u32,
    rows: u32,
) -> NavigationFields {
    let mut fields = NavigationFields::default();
    let mut frontier = VecDeque::new();

    let _ = fields.flow.insert(goal, None);
    let _ = fields.distance.insert(goal, 0);
    frontier.push_back(goal);

    while let Some(current) = frontier.pop_front() {
        let current_distance = fields.distance[&current];
        for neighbor in traversable_neighbors(tiles, current, columns, rows) {
            if fields.distance.contains_key(&neighbor) {
                continue;
            }
            let _ = fields.flow.insert(neighbor, Some(current));
            let _ = fields.distance.insert(neighbor, current_distance + 1);
            frontier.push_back(neighbor);
        }
    }

    fields
}

fn traversable_neighbors(
    tiles: &HashMap<GridPos, TileKind>,
    pos: GridPos,
    columns: u32,
    rows: u32,
) -> impl Iterator<Item = GridPos> + '_ {
    pos.orthogonal_neighbors().into_iter().filter(move |next| {
        in_bounds(*next, columns, rows)
            && tiles.get(next).map_or(true, |kind| kind.is_traversable())
    })
}

fn in_bounds(pos: GridPos, columns: u32, rows: u32) -> bool {
    pos.x() >= 0 && pos.y() >= 0 && (pos.x() as u32) < columns && (pos.y() as u32) < rows
}

/// Bounding rectangle of the contiguous spawnable region, if any exists.
///
/// A second, independent flood fill restricted to [`TileKind::Spawnable`]
/// tiles, seeded from the first spawnable tile in scan order. The region is
/// required to be contiguous and rectangular; this does not verify
/// rectangularity and silently returns an incorrect box for a
/// non-rectangular or split region.
pub(crate) fn compute_spawnable_area(
    tiles: &HashMap<GridPos, TileKind>,
    columns: u32,
    rows: u32,
) -> Option<Rect> {
    let seed = first_spawnable(tiles, columns, rows)?;

    let mut seen: HashSet<GridPos> = HashSet::new();
    let mut frontier = VecDeque::new();
    let _ = seen.insert(seed);
    frontier.push_back(seed);

    let (mut min_x, mut max_x) = (seed.x(), seed.x());
    let (mut min_y, mut max_y) = (seed.y(), seed.y());

    while let Some(current) = frontier.pop_front() {
        for neighbor in current.orthogonal_neighbors() {
            if !in_bounds(neighbor, columns, rows)
                || tiles.get(&neighbor) != Some(&TileKind::Spawnable)
                || seen.contains(&neighbor)
            {
                continue;
            }
            let _ = seen.insert(neighbor);
            frontier.push_back(neighbor);
            min_x = min_x.min(neighbor.x());
            max_x = max_x.max(neighbor.x());
            min_y = min_y.min(neighbor.y());
            max_y = max_y.max(neighbor.y());
        }
    }

    Some(Rect::new(
        DVec2::new(f64::from(min_x), f64::from(min_y)),
        DVec2::new(
            f64::from(max_x - min_x + 1),
            f64::from(max_y - min_y + 1),
        ),
    ))
}

fn first_spawnable(
    tiles: &HashMap<GridPos, TileKind>,
    columns: u32,
    rows: u32,
) -> Option<GridPos> {
    for y in 0..rows as i32 {
        for x in 0..columns as i32 {
            let pos = GridPos::new(x, y);
            if tiles.get(&pos) == Some(&TileKind::Spawnable) {
                return Some(pos);
            }
        }
    }
    None
}

/// Signed distance the point has progressed along the `from -> toward` axis,
/// expressed as a fraction of the unit vector between the two waypoints.
#[must_use]
pub fn waypoint_progress(from: DVec2, toward: DVec2, pos: DVec2) -> f64 {
    let axis = (toward - from).normalize_or_zero();
    (pos - from).dot(axis)
}

/// Composite closeness-to-goal score for a minion: the distance-field hop
/// count of its next waypoint plus a fractional term measured from the next
/// waypoint back toward the last one. Lower scores are closer to the goal; a
/// minion with no waypoints scores 0, as if fully arrived.
#[must_use]
pub fn pathfinding_progress(minion: &Minion, map: &GameMap) -> f64 {
    let (Some(next), Some(last)) = (
        minion.pathfinding.next_waypoint,
        minion.pathfinding.last_waypoint,
    ) else {
        return 0.0;
    };

    let hops = f64::from(map.distance(next).unwrap_or(0));
    hops + waypoint_progress(next.to_world(), last, minion.pos)
}
