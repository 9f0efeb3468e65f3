//! ASCII levels.
//!
//! Legend:
//!
//! | char | meaning |
//! |---|---|
//! | `#` | ground |
//! | `H` | ladder |
//! | `o` | coin |
//! | `$` | gem |
//! | `^` | trap |
//! | `G` | goal |
//! | `E` | enemy spawn |
//! | `P` | player start |
//! | `.` or space | nothing |
//!
//! An optional first line `bg: r,g,b` sets the background colour.

use crate::config::{ENEMY_SIZE, PLAYER_SIZE, TILE_SIZE};
use crate::geometry::Aabb;
use ggez::graphics::Color;

pub const COIN_VALUE: u64 = 10;
pub const GEM_VALUE: u64 = 50;

const COIN_SIZE: (f32, f32) = (16., 16.);

const LEVEL_SOURCES: [&str; 5] = [
    include_str!("../levels/level_01.txt"),
    include_str!("../levels/level_02.txt"),
    include_str!("../levels/level_03.txt"),
    include_str!("../levels/level_04.txt"),
    include_str!("../levels/level_05.txt"),
];

pub const DEFAULT_BACKGROUND: Color = Color {
    r: 0.6,
    g: 0.8,
    b: 0.9,
    a: 1.,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LevelError {
    #[error("level {level}: unknown tile '{ch}' at line {line}, column {col}")]
    UnknownTile {
        level: usize,
        line: usize,
        col: usize,
        ch: char,
    },

    #[error("level {level}: invalid background line '{value}'")]
    Background { level: usize, value: String },

    #[error("level {0} has no player start")]
    MissingStart(usize),

    #[error("level {0} has more than one player start")]
    DuplicateStart(usize),

    #[error("level {0} has no goal")]
    MissingGoal(usize),

    #[error("no levels to play")]
    NoLevels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Ground,
    Ladder,
    Trap,
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coin {
    pub bounds: Aabb,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// 1 based level number
    pub number: usize,

    /// Width in tiles
    pub width: usize,

    /// Height in tiles
    pub height: usize,

    tiles: Vec<Tile>,

    pub coins: Vec<Coin>,

    pub enemy_spawns: Vec<Aabb>,

    /// Player hitbox at the start of the level
    pub player_start: Aabb,

    pub background: Color,
}

impl Level {
    pub fn parse(number: usize, source: &str) -> Result<Self, LevelError> {
        let mut rows: Vec<&str> = source.lines().map(|l| l.trim_end_matches('\r')).collect();
        let mut background = DEFAULT_BACKGROUND;
        let mut line_offset = 1;

        if let Some(bg) = rows
            .first()
            .copied()
            .and_then(|l| l.trim().strip_prefix("bg:"))
        {
            background = parse_color(bg).ok_or_else(|| LevelError::Background {
                level: number,
                value: bg.trim().to_string(),
            })?;
            rows.remove(0);
            line_offset += 1;
        }

        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);

        let mut tiles = vec![Tile::Empty; width * height];
        let mut coins = vec![];
        let mut enemy_spawns = vec![];
        let mut player_start = None;
        let mut has_goal = false;

        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let tile = match ch {
                    '.' | ' ' => Tile::Empty,
                    '#' => Tile::Ground,
                    'H' => Tile::Ladder,
                    '^' => Tile::Trap,
                    'G' => {
                        has_goal = true;
                        Tile::Goal
                    }
                    'o' | '$' => {
                        coins.push(Coin {
                            bounds: Aabb::centered_in(col, row, TILE_SIZE, COIN_SIZE),
                            value: if ch == '$' { GEM_VALUE } else { COIN_VALUE },
                        });
                        Tile::Empty
                    }
                    'E' => {
                        enemy_spawns.push(Aabb::standing_in(col, row, TILE_SIZE, ENEMY_SIZE));
                        Tile::Empty
                    }
                    'P' => {
                        if player_start.is_some() {
                            return Err(LevelError::DuplicateStart(number));
                        }
                        player_start = Some(Aabb::standing_in(col, row, TILE_SIZE, PLAYER_SIZE));
                        Tile::Empty
                    }
                    ch => {
                        return Err(LevelError::UnknownTile {
                            level: number,
                            line: row + line_offset,
                            col: col + 1,
                            ch,
                        })
                    }
                };
                tiles[row * width + col] = tile;
            }
        }

        let player_start = player_start.ok_or(LevelError::MissingStart(number))?;
        if !has_goal {
            return Err(LevelError::MissingGoal(number));
        }

        Ok(Self {
            number,
            width,
            height,
            tiles,
            coins,
            enemy_spawns,
            player_start,
            background,
        })
    }

    /// Tile at the given position, anything outside the map is empty
    #[inline]
    pub fn tile(&self, col: usize, row: usize) -> Tile {
        if col >= self.width || row >= self.height {
            return Tile::Empty;
        }
        self.tiles[row * self.width + col]
    }

    /// Map width in pixels
    #[inline]
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    /// Map height in pixels
    #[inline]
    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    /// Boxes of every `kind` tile strictly overlapping `area`
    pub fn overlapping(&self, area: Aabb, kind: Tile) -> impl Iterator<Item = Aabb> + '_ {
        let to_index = |v: f32| (v / TILE_SIZE).floor().max(0.) as usize;

        let cols = to_index(area.x)..=to_index(area.right()).min(self.width.saturating_sub(1));
        let rows = to_index(area.y)..=to_index(area.bottom()).min(self.height.saturating_sub(1));

        rows.flat_map(move |row| cols.clone().map(move |col| (col, row)))
            .filter(move |&(col, row)| self.tile(col, row) == kind)
            .map(|(col, row)| Aabb::tile(col, row, TILE_SIZE))
            .filter(move |tile| tile.overlaps(&area))
    }

    #[inline]
    pub fn touches(&self, area: Aabb, kind: Tile) -> bool {
        self.overlapping(area, kind).next().is_some()
    }

    /// Every non empty tile with its box, for drawing
    pub fn tiles(&self) -> impl Iterator<Item = (Tile, Aabb)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile != Tile::Empty)
            .map(|(i, tile)| {
                (
                    *tile,
                    Aabb::tile(i % self.width, i / self.width, TILE_SIZE),
                )
            })
    }
}

/// Parse the levels shipped with the game
pub fn builtin() -> Result<Vec<Level>, LevelError> {
    LEVEL_SOURCES
        .iter()
        .enumerate()
        .map(|(i, src)| Level::parse(i + 1, src))
        .collect()
}

fn parse_color(value: &str) -> Option<Color> {
    let mut parts = value.split(',').map(|p| p.trim().parse::<u8>());
    let color = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Ok(r)), Some(Ok(g)), Some(Ok(b)), None) => Color::from_rgb(r, g, b),
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
bg: 10,20,30
....G
.o$E.
P..^.
#####";

    #[test]
    fn parses_small_level() {
        let level = Level::parse(1, SMALL).unwrap();

        assert_eq!((level.width, level.height), (5, 4));
        assert_eq!(level.background, Color::from_rgb(10, 20, 30));
        assert_eq!(level.tile(4, 0), Tile::Goal);
        assert_eq!(level.tile(3, 2), Tile::Trap);
        assert_eq!(level.tile(0, 3), Tile::Ground);
        assert_eq!(level.tile(1, 1), Tile::Empty);
        assert_eq!(level.tile(99, 99), Tile::Empty);

        let values: Vec<u64> = level.coins.iter().map(|c| c.value).collect();
        assert_eq!(values, vec![COIN_VALUE, GEM_VALUE]);
        assert_eq!(level.enemy_spawns.len(), 1);
        assert_eq!(level.player_start.bottom(), 3. * TILE_SIZE);
    }

    #[test]
    fn background_is_optional() {
        let level = Level::parse(1, "P.G\n###").unwrap();
        assert_eq!(level.background, DEFAULT_BACKGROUND);
        assert_eq!(level.height, 2);
    }

    #[test]
    fn reports_unknown_tiles_with_position() {
        let err = Level::parse(3, "bg: 1,2,3\nP.G\n#x#").unwrap_err();
        assert_eq!(
            err,
            LevelError::UnknownTile {
                level: 3,
                line: 3,
                col: 2,
                ch: 'x'
            }
        );
    }

    #[test]
    fn rejects_incomplete_levels() {
        assert_eq!(Level::parse(1, "..G\n###"), Err(LevelError::MissingStart(1)));
        assert_eq!(Level::parse(1, "P..\n###"), Err(LevelError::MissingGoal(1)));
        assert_eq!(Level::parse(1, "PPG\n###"), Err(LevelError::DuplicateStart(1)));
        assert!(matches!(
            Level::parse(1, "bg: red\nP.G"),
            Err(LevelError::Background { .. })
        ));
    }

    #[test]
    fn overlapping_finds_ground_under_feet() {
        let level = Level::parse(1, SMALL).unwrap();
        let feet = Aabb::new(4., 3. * TILE_SIZE - 1., 10., 4.);

        let hits: Vec<Aabb> = level.overlapping(feet, Tile::Ground).collect();
        assert_eq!(hits, vec![Aabb::tile(0, 3, TILE_SIZE)]);
        assert!(!level.touches(level.player_start, Tile::Ground));
    }

    #[test]
    fn builtin_levels_parse() {
        let levels = builtin().unwrap();
        assert_eq!(levels.len(), 5);
        for (i, level) in levels.iter().enumerate() {
            assert_eq!(level.number, i + 1);
            assert!(!level.touches(level.player_start, Tile::Ground));
        }
        assert!(!levels[1].enemy_spawns.is_empty());
    }
}
