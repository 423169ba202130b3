//! Built-in map rotation.
//!
//! Each tile is two characters: the kind digit (0 open, 1 goal, 2 wall,
//! 3 spawnable) and a metadata digit, where `1` on a wall hosts a basic
//! tower. Every map keeps one rectangular spawnable block and exactly one
//! goal tile.

/// A named built-in map.
#[derive(Clone, Copy, Debug)]
pub struct BuiltinMap {
    /// Identifier used by the playlist rotation.
    pub id: &'static str,
    /// Map text in the two-characters-per-tile encoding.
    pub text: &'static str,
}

/// The rotation the game cycles through, in order.
pub const BUILTIN: [BuiltinMap; 5] = [
    BuiltinMap {
        id: "boot-sector",
        text: "\
2020202020202020
3000002100000020
3000002100000020
3000000000210010
3000210000000020
2020202020202020",
    },
    BuiltinMap {
        id: "firewall",
        text: "\
30300000210000000000
30300000210000210000
30300000000000000010
30300000210000210000
30300000210000000000",
    },
    BuiltinMap {
        id: "heap-walk",
        text: "\
300000200000000000
300000210000200000
300000200000210000
300000200000200010
300000000000200000
300000210000200000
300000200000000000",
    },
    BuiltinMap {
        id: "kernel-gate",
        text: "\
300021000000000021000000
300000002100000000000000
300021000000210000000010
300000002100000000000000
300021000000000021000000",
    },
    BuiltinMap {
        id: "stack-overrun",
        text: "\
00000000000000
00303000210000
00303000000000
00303000210010
00303000000000
00303000210000
00000000000000",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use data_defence_core::{config::GameConfig, TowerKind};
    use data_defence_world::Stage;

    #[test]
    fn every_builtin_map_loads() {
        let config = GameConfig::default();
        for map in BUILTIN {
            let stage = Stage::load(map.id, map.text, &config, crate::DEFAULT_VIEWPORT)
                .unwrap_or_else(|error| panic!("map '{}' failed: {error}", map.id));
            assert!(stage.goal_tower().is_some(), "map '{}'", map.id);
            assert!(
                stage
                    .towers()
                    .iter()
                    .any(|(_, tower)| tower.kind == TowerKind::Basic),
                "map '{}' has no basic towers",
                map.id
            );
        }
    }

    #[test]
    fn every_builtin_goal_is_reachable_from_the_spawn_area() {
        let config = GameConfig::default();
        for map in BUILTIN {
            let stage = Stage::load(map.id, map.text, &config, crate::DEFAULT_VIEWPORT)
                .unwrap_or_else(|error| panic!("map '{}' failed: {error}", map.id));
            let spawn_center = stage.map().spawnable_area().min();
            assert!(
                stage.map().next_waypoint(spawn_center).is_some(),
                "map '{}' spawn cannot reach the goal",
                map.id
            );
        }
    }
}
