//! All game entity types: pure data, almost no logic.

use std::f64::consts::TAU;

use crate::frame::ColorId;

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Kind of a map cell.  `Boundary` is never stored; it is what lookups
/// outside the grid return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Floor,
    Door,
    Boundary,
}

/// Integer cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing a world-space point.  Uses `floor` so that small
    /// negative coordinates land outside the grid instead of in cell 0.
    pub fn containing(x: f64, y: f64) -> Self {
        Self {
            x: x.floor() as i32,
            y: y.floor() as i32,
        }
    }

    /// World-space centre of the cell.
    pub fn center(self) -> (f64, f64) {
        (self.x as f64 + 0.5, self.y as f64 + 0.5)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Door {
    pub pos: GridPos,
    pub is_open: bool,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    /// Radians in `[0, 2π)`.  Angle 0 looks along +x; +π/2 looks along +y
    /// (down the rows of the map).
    pub angle: f64,
    pub health: u32,
    pub ammo: u32,
    pub score: u32,
}

impl Player {
    /// Unit forward vector.
    pub fn forward(&self) -> (f64, f64) {
        (self.angle.cos(), self.angle.sin())
    }

    /// Unit vector pointing to the right of `forward` on screen.
    pub fn right(&self) -> (f64, f64) {
        (-self.angle.sin(), self.angle.cos())
    }

    pub fn rotate(&mut self, delta: f64) {
        self.angle = normalize_angle(self.angle + delta);
    }

    pub fn cell(&self) -> GridPos {
        GridPos::containing(self.x, self.y)
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (x - self.x).hypot(y - self.y)
    }
}

/// Wrap any finite angle into `[0, 2π)`.  Non-finite input maps to 0.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectibleKind {
    Health,
    Ammo,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub health: i32,
    pub max_health: i32,
    /// Seconds an enemy waits between two attacks.
    pub attack_cooldown: f64,
    /// Game-clock timestamp of the last attack, if any.
    pub last_attack_at: Option<f64>,
}

impl Enemy {
    /// "Damaged" once health has dropped to half or below.
    pub fn is_damaged(&self) -> bool {
        self.health * 2 <= self.max_health
    }

    pub fn can_attack(&self, now: f64) -> bool {
        match self.last_attack_at {
            None => true,
            Some(last) => now - last >= self.attack_cooldown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Collectible(CollectibleKind),
    Enemy(Enemy),
}

/// A slot in the entity store.  Entities are deactivated, never removed, so
/// slot indices stay valid for the whole level.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub x: f64,
    pub y: f64,
    pub glyph: char,
    pub color: ColorId,
    pub active: bool,
    pub kind: EntityKind,
}

impl Entity {
    pub fn collectible(x: f64, y: f64, kind: CollectibleKind) -> Self {
        let (glyph, color) = match kind {
            CollectibleKind::Health => ('+', ColorId::Green),
            CollectibleKind::Ammo => ('!', ColorId::Yellow),
        };
        Self {
            x,
            y,
            glyph,
            color,
            active: true,
            kind: EntityKind::Collectible(kind),
        }
    }

    pub fn enemy(x: f64, y: f64, health: i32, attack_cooldown: f64) -> Self {
        Self {
            x,
            y,
            glyph: 'M',
            color: ColorId::Red,
            active: true,
            kind: EntityKind::Enemy(Enemy {
                health,
                max_health: health,
                attack_cooldown,
                last_attack_at: None,
            }),
        }
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, EntityKind::Enemy(_))
    }

    pub fn is_collectible(&self) -> bool {
        matches!(self.kind, EntityKind::Collectible(_))
    }

    /// Glyph and colour for the current state.  Enemies switch band once
    /// damaged.
    pub fn appearance(&self) -> (char, ColorId) {
        match &self.kind {
            EntityKind::Enemy(enemy) if enemy.is_damaged() => ('m', ColorId::Magenta),
            _ => (self.glyph, self.color),
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// A slot in the projectile pool.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Projectile {
    pub x: f64,
    pub y: f64,
    pub dir_x: f64,
    pub dir_y: f64,
    pub speed: f64,
    /// Distance covered since launch.
    pub travelled: f64,
    pub active: bool,
}

// ── Level markers ─────────────────────────────────────────────────────────────

/// What a map marker spawns at level (re)initialisation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnKind {
    Health,
    Ammo,
    Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spawn {
    pub pos: GridPos,
    pub kind: SpawnKind,
}

// ── Game state ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    GameOver,
    Win,
}
