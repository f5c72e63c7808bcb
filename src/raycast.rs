//! Per-column wall projection by grid traversal.
//!
//! Each screen column gets one ray.  The ray walks the grid cell by cell,
//! always crossing whichever grid line (vertical or horizontal) is nearer,
//! until it enters a cell that `Map::is_passable` rejects.  The reported
//! distance is measured along the camera's forward axis, which keeps walls
//! straight instead of bulging at the screen centre.

use crate::entities::{GridPos, Player, Tile};
use crate::frame::{Cell, ColorId};
use crate::map::Map;

/// Lower bound for every wall distance.
pub const MIN_WALL_DISTANCE: f64 = 0.01;

/// Stand-in for `1 / 0` when a ray component is (almost) zero.  Finite so
/// that `0 * DELTA_INFINITY` stays 0 rather than NaN.
const DELTA_INFINITY: f64 = 1e30;
const DIRECTION_EPSILON: f64 = 1e-12;

// ── Camera ───────────────────────────────────────────────────────────────────

/// Player pose expressed as a forward vector plus a camera plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub dir: (f64, f64),
    /// Right-pointing vector whose length is `tan(fov / 2)`.
    pub plane: (f64, f64),
}

impl Camera {
    pub fn new(player: &Player, plane_scale: f64) -> Self {
        let (rx, ry) = player.right();
        Self {
            x: player.x,
            y: player.y,
            dir: player.forward(),
            plane: (rx * plane_scale, ry * plane_scale),
        }
    }

    /// Ray direction for a screen column.  Column 0 maps to the left edge of
    /// the field of view (camera offset -1), column `width` to the right (+1).
    pub fn ray_direction(&self, column: usize, width: usize) -> (f64, f64) {
        let camera_x = 2.0 * column as f64 / width.max(1) as f64 - 1.0;
        (
            self.dir.0 + self.plane.0 * camera_x,
            self.dir.1 + self.plane.1 * camera_x,
        )
    }

    /// World point to `(lateral, depth)`.  `depth` is the distance along the
    /// forward axis; `lateral` is scaled so that `lateral / depth` is -1 at
    /// the left edge of the view and +1 at the right edge.
    pub fn to_camera_space(&self, x: f64, y: f64) -> (f64, f64) {
        let (dx, dy) = (x - self.x, y - self.y);
        let depth = dx * self.dir.0 + dy * self.dir.1;
        let plane_len_sq = self.plane.0 * self.plane.0 + self.plane.1 * self.plane.1;
        let lateral = if plane_len_sq > DIRECTION_EPSILON {
            (dx * self.plane.0 + dy * self.plane.1) / plane_len_sq
        } else {
            0.0
        };
        (lateral, depth)
    }

    /// Screen column of a camera-space point with positive depth.
    pub fn project_column(lateral: f64, depth: f64, width: usize) -> f64 {
        (width as f64 / 2.0) * (1.0 + lateral / depth)
    }
}

// ── Grid traversal ───────────────────────────────────────────────────────────

/// Which family of grid lines the ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// A vertical line (constant x): an east/west facing wall.
    X,
    /// A horizontal line (constant y): a north/south facing wall.
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Perpendicular distance, in `[MIN_WALL_DISTANCE, max_distance]`.
    pub distance: f64,
    pub side: Side,
    pub cell: GridPos,
    /// The solid tile that stopped the ray; `Tile::Boundary` when the ray
    /// left the grid, `None` when nothing solid was found within range.
    pub tile: Option<Tile>,
}

impl RayHit {
    fn miss(max_distance: f64, side: Side, cell: GridPos) -> Self {
        Self {
            distance: max_distance,
            side,
            cell,
            tile: None,
        }
    }

    /// True if a real wall or door face is within render range.
    pub fn is_visible_wall(&self) -> bool {
        matches!(self.tile, Some(Tile::Wall) | Some(Tile::Door))
    }
}

/// Cast one ray from `(ox, oy)` along `(dir_x, dir_y)`.
///
/// With a non-unit direction of the form `forward + plane * k` the returned
/// distance is the perpendicular (fisheye-free) distance; with a unit
/// direction it is the Euclidean distance along the ray.
pub fn cast_ray(map: &Map, ox: f64, oy: f64, dir_x: f64, dir_y: f64, max_distance: f64) -> RayHit {
    let mut cell = GridPos::containing(ox, oy);
    if !(ox.is_finite() && oy.is_finite() && dir_x.is_finite() && dir_y.is_finite()) {
        return RayHit::miss(max_distance, Side::X, cell);
    }

    let delta_x = if dir_x.abs() < DIRECTION_EPSILON { DELTA_INFINITY } else { (1.0 / dir_x).abs() };
    let delta_y = if dir_y.abs() < DIRECTION_EPSILON { DELTA_INFINITY } else { (1.0 / dir_y).abs() };

    let (step_x, mut side_x) = if dir_x < 0.0 {
        (-1, (ox - cell.x as f64) * delta_x)
    } else {
        (1, (cell.x as f64 + 1.0 - ox) * delta_x)
    };
    let (step_y, mut side_y) = if dir_y < 0.0 {
        (-1, (oy - cell.y as f64) * delta_y)
    } else {
        (1, (cell.y as f64 + 1.0 - oy) * delta_y)
    };

    loop {
        let side = if side_x < side_y {
            if side_x > max_distance {
                return RayHit::miss(max_distance, Side::X, cell);
            }
            side_x += delta_x;
            cell.x += step_x;
            Side::X
        } else {
            if side_y > max_distance {
                return RayHit::miss(max_distance, Side::Y, cell);
            }
            side_y += delta_y;
            cell.y += step_y;
            Side::Y
        };

        if !map.in_bounds(cell.x, cell.y) {
            return RayHit {
                distance: max_distance,
                side,
                cell,
                tile: Some(Tile::Boundary),
            };
        }
        if map.is_passable(cell.x, cell.y) {
            continue;
        }

        // Distance from the origin to the grid line of the entered cell.
        let raw = match side {
            Side::X => (cell.x as f64 + (1 - step_x) as f64 / 2.0 - ox) / dir_x,
            Side::Y => (cell.y as f64 + (1 - step_y) as f64 / 2.0 - oy) / dir_y,
        };
        let distance = if raw.is_finite() { raw.max(MIN_WALL_DISTANCE) } else { max_distance };
        if distance > max_distance {
            return RayHit::miss(max_distance, side, cell);
        }
        return RayHit {
            distance,
            side,
            cell,
            tile: Some(map.tile_at(cell.x, cell.y)),
        };
    }
}

/// Cast one ray per screen column.
pub fn cast_view(map: &Map, camera: &Camera, width: usize, max_distance: f64) -> Vec<RayHit> {
    (0..width)
        .map(|column| {
            let (dx, dy) = camera.ray_direction(column, width);
            cast_ray(map, camera.x, camera.y, dx, dy, max_distance)
        })
        .collect()
}

// ── Depth buffer ─────────────────────────────────────────────────────────────

/// Nearest wall distance per screen column.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthBuffer {
    depths: Vec<f64>,
}

impl DepthBuffer {
    pub fn new(width: usize, max_distance: f64) -> Self {
        Self {
            depths: vec![max_distance; width],
        }
    }

    pub fn from_hits(hits: &[RayHit]) -> Self {
        Self {
            depths: hits.iter().map(|h| h.distance).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    pub fn get(&self, column: usize) -> Option<f64> {
        self.depths.get(column).copied()
    }

    pub fn set(&mut self, column: usize, depth: f64) {
        if let Some(slot) = self.depths.get_mut(column) {
            *slot = depth;
        }
    }

    /// Something at `depth` shows in `column` only if strictly nearer than
    /// the wall recorded there.  Columns off screen are never visible.
    pub fn is_visible(&self, column: i64, depth: f64) -> bool {
        if column < 0 {
            return false;
        }
        self.get(column as usize).is_some_and(|wall| depth < wall)
    }
}

// ── Column projection and shading ────────────────────────────────────────────

/// First and last screen row (inclusive) covered by a wall at `distance`.
pub fn wall_span(distance: f64, screen_height: usize) -> (i64, i64) {
    let h = screen_height as i64;
    let line_height = (screen_height as f64 / distance.max(MIN_WALL_DISTANCE)).min(1e6) as i64;
    let start = (h / 2 - line_height / 2).max(0);
    let end = (h / 2 + line_height / 2).min(h - 1);
    (start, end)
}

/// Glyph and colour for a wall slice, banded by distance.
pub fn wall_cell(hit: &RayHit, max_distance: f64) -> Cell {
    if !hit.is_visible_wall() || hit.distance >= max_distance {
        return Cell::BLANK;
    }
    let glyph = match hit.distance {
        d if d < 3.0 => '█',
        d if d < 6.0 => '▓',
        d if d < 9.0 => '▒',
        _ => '░',
    };
    let color = match (hit.tile, hit.side) {
        (Some(Tile::Door), _) => ColorId::Yellow,
        (_, Side::Y) => ColorId::Cyan,
        (_, Side::X) => ColorId::Blue,
    };
    Cell::new(glyph, color)
}

/// Shading for a floor or ceiling row.  The distance is approximated from
/// the row's offset to the horizon; no ray is cast.
pub fn surface_cell(row: usize, screen_height: usize) -> Cell {
    let half = screen_height as f64 / 2.0;
    let offset = (row as f64 - half).abs();
    let distance = if offset > 0.0 { (half / offset).max(MIN_WALL_DISTANCE) } else { f64::INFINITY };
    let glyph = match distance {
        d if d < 2.0 => '#',
        d if d < 4.0 => '=',
        d if d < 6.0 => '-',
        d if d < 10.0 => ',',
        _ => ' ',
    };
    let color = if (row as f64) < half { ColorId::DarkGray } else { ColorId::LightGray };
    Cell::new(glyph, color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_span_is_clipped_for_very_near_walls() {
        assert_eq!(wall_span(MIN_WALL_DISTANCE, 30), (0, 29));
    }

    #[test]
    fn wall_span_is_centred() {
        // 30 / 3 = 10 rows, centred on row 15
        assert_eq!(wall_span(3.0, 30), (10, 20));
    }

    #[test]
    fn surface_bands_fade_towards_horizon() {
        assert_eq!(surface_cell(29, 30).glyph, '#');
        assert_eq!(surface_cell(15, 30).glyph, ' ');
        assert_eq!(surface_cell(0, 30).color, ColorId::DarkGray);
    }
}
