//! Static tile grid, door registry and the textual map loader.
//!
//! `Map::is_passable` is the single "is this cell solid" predicate.  Movement,
//! shooting, enemy AI and the raycaster all go through it, so a door that
//! blocks the player also blocks rays and bullets.

use std::collections::HashMap;

use tracing::debug;

use crate::entities::{Door, GridPos, Spawn, SpawnKind, Tile};
use crate::error::MapError;

/// The level shipped with the binary.
pub const DEFAULT_LEVEL: &str = include_str!("../assets/level1.txt");

// ── Door registry ────────────────────────────────────────────────────────────

/// Door records in row-major load order, with a position index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DoorRegistry {
    doors: Vec<Door>,
    index: HashMap<GridPos, usize>,
}

impl DoorRegistry {
    fn insert(&mut self, pos: GridPos) {
        if self.index.contains_key(&pos) {
            return;
        }
        self.index.insert(pos, self.doors.len());
        self.doors.push(Door {
            pos,
            is_open: false,
        });
    }

    pub fn get(&self, pos: GridPos) -> Option<&Door> {
        self.index.get(&pos).map(|&i| &self.doors[i])
    }

    pub fn is_open(&self, pos: GridPos) -> Option<bool> {
        self.get(pos).map(|d| d.is_open)
    }

    /// Flip a door and return its new state, or `None` if there is no door.
    pub fn toggle(&mut self, pos: GridPos) -> Option<bool> {
        let i = *self.index.get(&pos)?;
        let door = &mut self.doors[i];
        door.is_open = !door.is_open;
        Some(door.is_open)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Door> {
        self.doors.iter()
    }

    pub fn len(&self) -> usize {
        self.doors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    pub fn close_all(&mut self) {
        for door in &mut self.doors {
            door.is_open = false;
        }
    }
}

// ── Map ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    doors: DoorRegistry,
}

impl Map {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Tile kind at a cell, `Tile::Boundary` outside the grid.
    pub fn tile_at(&self, x: i32, y: i32) -> Tile {
        if !self.in_bounds(x, y) {
            return Tile::Boundary;
        }
        self.tiles[y as usize * self.width + x as usize]
    }

    /// Floor, or a door whose registry entry is open.
    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        match self.tile_at(x, y) {
            Tile::Floor => true,
            Tile::Door => self
                .doors
                .is_open(GridPos::new(x, y))
                .unwrap_or(false),
            Tile::Wall | Tile::Boundary => false,
        }
    }

    /// `is_passable` for the cell containing a world-space point.
    pub fn is_passable_at(&self, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let cell = GridPos::containing(x, y);
        self.is_passable(cell.x, cell.y)
    }

    /// Flip the door at `(x, y)`.  Returns the new state, or `None` (and
    /// changes nothing) when no door is registered there.
    pub fn toggle_door(&mut self, x: i32, y: i32) -> Option<bool> {
        let toggled = self.doors.toggle(GridPos::new(x, y));
        if let Some(open) = toggled {
            debug!(x, y, open, "door toggled");
        }
        toggled
    }

    pub fn doors(&self) -> &DoorRegistry {
        &self.doors
    }

    pub fn reset_doors(&mut self) {
        self.doors.close_all();
    }
}

// ── Loading ──────────────────────────────────────────────────────────────────

/// A parsed map source: the grid plus the markers that seed a level.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub map: Map,
    pub player_start: GridPos,
    pub spawns: Vec<Spawn>,
}

impl Level {
    /// Parse the textual grid.  Vocabulary: `#` wall, `.` floor, `D` door
    /// (closed), `H` health pack, `A` ammo pack, `E` enemy, `P` player start.
    /// Blank lines are ignored.
    pub fn parse(source: &str) -> Result<Self, MapError> {
        let rows: Vec<&str> = source
            .lines()
            .map(|l| l.trim_end())
            .filter(|l| !l.is_empty())
            .collect();
        let width = rows.first().map(|r| r.chars().count()).ok_or(MapError::Empty)?;

        let mut tiles = Vec::with_capacity(width * rows.len());
        let mut doors = DoorRegistry::default();
        let mut spawns = Vec::new();
        let mut player_start = None;

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MapError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let pos = GridPos::new(x as i32, y as i32);
                let tile = match glyph {
                    '#' => Tile::Wall,
                    '.' => Tile::Floor,
                    'D' => {
                        doors.insert(pos);
                        Tile::Door
                    }
                    'H' | 'A' | 'E' => {
                        let kind = match glyph {
                            'H' => SpawnKind::Health,
                            'A' => SpawnKind::Ammo,
                            _ => SpawnKind::Enemy,
                        };
                        spawns.push(Spawn { pos, kind });
                        Tile::Floor
                    }
                    'P' => {
                        if player_start.is_some() {
                            return Err(MapError::DuplicatePlayerStart { x, y });
                        }
                        player_start = Some(pos);
                        Tile::Floor
                    }
                    other => return Err(MapError::UnknownGlyph { glyph: other, x, y }),
                };
                tiles.push(tile);
            }
        }

        let player_start = player_start.ok_or(MapError::MissingPlayerStart)?;
        debug!(
            width,
            height = rows.len(),
            doors = doors.len(),
            spawns = spawns.len(),
            "level parsed"
        );

        Ok(Self {
            map: Map {
                width,
                height: rows.len(),
                tiles,
                doors,
            },
            player_start,
            spawns,
        })
    }

    pub fn default_level() -> Result<Self, MapError> {
        Self::parse(DEFAULT_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_parses() {
        let level = Level::default_level().expect("bundled level is valid");
        assert_eq!(level.map.width(), 20);
        assert_eq!(level.map.height(), 20);
        assert_eq!(level.player_start, GridPos::new(2, 2));
        assert_eq!(level.map.doors().len(), 3);
    }

    #[test]
    fn every_door_tile_has_a_record() {
        let level = Level::default_level().unwrap();
        let map = &level.map;
        for y in 0..map.height() as i32 {
            for x in 0..map.width() as i32 {
                let has_record = map.doors().get(GridPos::new(x, y)).is_some();
                assert_eq!(map.tile_at(x, y) == Tile::Door, has_record);
            }
        }
    }
}
