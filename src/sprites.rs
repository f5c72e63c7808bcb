//! Billboard sprites: entities and projectiles composited over the walls.
//!
//! Sprites are drawn farthest first so nearer ones overwrite them, and every
//! column is tested against the depth buffer on its own, so a sprite half
//! hidden behind a wall corner is cut exactly at the corner.

use std::cmp::Ordering;

use crate::entities::{Entity, Projectile};
use crate::frame::{Cell, ColorId, Frame};
use crate::raycast::{Camera, DepthBuffer};

/// Sprites closer than this are not drawn (the player's own position).
pub const MIN_SPRITE_DISTANCE: f64 = 0.1;
/// Sprites whose forward depth is at or below this are behind the camera.
pub const MIN_SPRITE_DEPTH: f64 = 1e-6;

pub const ENTITY_SCALE: f64 = 0.6;
pub const PROJECTILE_SCALE: f64 = 0.15;

/// Which pool a sprite came from, and its slot there.  Orders entities before
/// projectiles, then by slot, which is the tie-break for equal distances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SpriteSource {
    Entity(usize),
    Projectile(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub source: SpriteSource,
    pub x: f64,
    pub y: f64,
    pub glyph: char,
    pub color: ColorId,
    /// World-space size relative to one cell.
    pub scale: f64,
    /// Euclidean distance to the camera.
    pub distance: f64,
}

/// Active entities and projectiles within render range, unsorted.
pub fn collect(
    camera: &Camera,
    entities: &[Entity],
    projectiles: &[Projectile],
    max_distance: f64,
) -> Vec<Sprite> {
    let in_range = |d: f64| d >= MIN_SPRITE_DISTANCE && d <= max_distance;
    let mut sprites = Vec::new();

    for (slot, entity) in entities.iter().enumerate().filter(|(_, e)| e.active) {
        let distance = (entity.x - camera.x).hypot(entity.y - camera.y);
        if !in_range(distance) {
            continue;
        }
        let (glyph, color) = entity.appearance();
        sprites.push(Sprite {
            source: SpriteSource::Entity(slot),
            x: entity.x,
            y: entity.y,
            glyph,
            color,
            scale: ENTITY_SCALE,
            distance,
        });
    }

    for (slot, proj) in projectiles.iter().enumerate().filter(|(_, p)| p.active) {
        let distance = (proj.x - camera.x).hypot(proj.y - camera.y);
        if !in_range(distance) {
            continue;
        }
        sprites.push(Sprite {
            source: SpriteSource::Projectile(slot),
            x: proj.x,
            y: proj.y,
            glyph: '*',
            color: ColorId::White,
            scale: PROJECTILE_SCALE,
            distance,
        });
    }

    sprites
}

/// Farthest first; equal distances fall back to source order so the result
/// does not depend on the input order.
pub fn sort_far_to_near(sprites: &mut [Sprite]) {
    sprites.sort_by(|a, b| match b.distance.total_cmp(&a.distance) {
        Ordering::Equal => a.source.cmp(&b.source),
        other => other,
    });
}

/// Project one sprite into the frame.  Returns the number of columns that
/// passed the depth test.
pub fn draw(
    frame: &mut Frame,
    depth: &DepthBuffer,
    camera: &Camera,
    sprite: &Sprite,
) -> usize {
    let (lateral, z) = camera.to_camera_space(sprite.x, sprite.y);
    if z <= MIN_SPRITE_DEPTH {
        return 0;
    }

    let width = frame.width();
    let height = frame.height();
    let plane_len = camera.plane.0.hypot(camera.plane.1).max(MIN_SPRITE_DEPTH);

    let center_col = Camera::project_column(lateral, z, width);
    let cols = (sprite.scale * (width as f64 / 2.0) / (plane_len * z)).max(1.0);
    let rows = (sprite.scale * height as f64 / z).max(1.0);

    let first_col = (center_col - cols / 2.0).floor().max(0.0);
    let last_col = (center_col + cols / 2.0).ceil().min(width as f64);
    let mid = height as f64 / 2.0;
    let first_row = (mid - rows / 2.0).floor().max(0.0) as i64;
    let last_row = (mid + rows / 2.0).ceil().min(height as f64) as i64;

    if first_col >= last_col {
        return 0;
    }

    let cell = Cell::new(sprite.glyph, sprite.color);
    let mut drawn = 0;
    for col in first_col as i64..last_col as i64 {
        if !depth.is_visible(col, z) {
            continue;
        }
        for row in first_row..last_row {
            frame.set(col, row, cell);
        }
        drawn += 1;
    }
    drawn
}

/// Sort and draw every sprite.
pub fn draw_all(frame: &mut Frame, depth: &DepthBuffer, camera: &Camera, mut sprites: Vec<Sprite>) {
    sort_far_to_near(&mut sprites);
    for sprite in &sprites {
        draw(frame, depth, camera, sprite);
    }
}
