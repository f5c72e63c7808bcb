//! Frame compositor: reads the world, produces a `Frame`.
//!
//! Layer order: walls with floor and ceiling, then sprites (farthest first,
//! depth-tested per column), then the state overlay.  HUD, minimap and
//! status text go to the frame's auxiliary lines.  No game logic here.

use crate::entities::{GameState, GridPos, Tile};
use crate::frame::{ColorId, Frame, TextLine};
use crate::raycast::{self, Camera, DepthBuffer, RayHit};
use crate::sprites;
use crate::world::GameWorld;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_HEALTH: ColorId = ColorId::Green;
const C_HUD_AMMO: ColorId = ColorId::Yellow;
const C_HUD_SCORE: ColorId = ColorId::Cyan;
const C_DOOR_OPEN: ColorId = ColorId::Green;
const C_DOOR_CLOSED: ColorId = ColorId::Yellow;
const C_MINIMAP_PLAYER: ColorId = ColorId::Red;
const C_HINT: ColorId = ColorId::DarkGray;
const C_TITLE: ColorId = ColorId::Cyan;
const C_GAME_OVER: ColorId = ColorId::Red;
const C_WIN: ColorId = ColorId::Green;
const C_SCORE: ColorId = ColorId::Yellow;

// ── Public entry point ────────────────────────────────────────────────────────

/// Build the complete frame for the current world.
pub fn compose(world: &GameWorld) -> Frame {
    let width = world.config.screen.width;
    let height = world.config.screen.height;
    let max_distance = world.config.camera.max_render_distance;

    let mut frame = Frame::new(width, height);
    let camera = Camera::new(&world.player, world.config.camera.plane_scale());

    let hits = raycast::cast_view(&world.map, &camera, width, max_distance);
    let depth = DepthBuffer::from_hits(&hits);
    draw_walls(&mut frame, &hits, max_distance);

    let visible = sprites::collect(&camera, &world.entities, &world.projectiles, max_distance);
    sprites::draw_all(&mut frame, &depth, &camera, visible);

    draw_overlay(&mut frame, world);

    frame.lines = hud_lines(world);
    frame.lines.extend(minimap_lines(world));
    frame.lines.extend(status_lines(world));
    frame
}

// ── World view ───────────────────────────────────────────────────────────────

fn draw_walls(frame: &mut Frame, hits: &[RayHit], max_distance: f64) {
    let height = frame.height();
    for (col, hit) in hits.iter().enumerate() {
        let (start, end) = raycast::wall_span(hit.distance, height);
        let wall = raycast::wall_cell(hit, max_distance);
        for row in 0..height {
            let r = row as i64;
            let cell = if r < start || r > end {
                raycast::surface_cell(row, height)
            } else {
                wall
            };
            frame.set(col as i64, r, cell);
        }
    }
}

// ── State overlays ───────────────────────────────────────────────────────────

fn banner(title: &str) -> [String; 3] {
    let inner = title.chars().count() + 8;
    [
        format!("╔{}╗", "═".repeat(inner)),
        format!("║    {}    ║", title),
        format!("╚{}╝", "═".repeat(inner)),
    ]
}

fn draw_overlay(frame: &mut Frame, world: &GameWorld) {
    let (title, color, hints): (&str, ColorId, Vec<(String, ColorId)>) = match world.state {
        GameState::Playing => return,
        GameState::Menu => (
            "ASCII  RAYCASTER",
            C_TITLE,
            vec![
                ("Collect every item and defeat every enemy".to_string(), ColorId::White),
                ("ENTER / SPACE : Start   X : Quit".to_string(), C_HINT),
            ],
        ),
        GameState::GameOver => (
            "GAME  OVER",
            C_GAME_OVER,
            vec![
                (format!("Final Score: {:>6}", world.player.score), C_SCORE),
                ("R - Play Again  X - Quit".to_string(), ColorId::White),
            ],
        ),
        GameState::Win => (
            "YOU  WIN!",
            C_WIN,
            vec![
                (format!("Final Score: {:>6}", world.player.score), C_SCORE),
                ("R - Play Again  X - Quit".to_string(), ColorId::White),
            ],
        ),
    };

    let total_rows = 3 + hints.len() as i64;
    let start_row = (frame.height() as i64 - total_rows) / 2;
    for (i, line) in banner(title).iter().enumerate() {
        frame.put_centered(start_row + i as i64, line, color);
    }
    for (i, (text, color)) in hints.iter().enumerate() {
        frame.put_centered(start_row + 3 + i as i64, text, *color);
    }
}

// ── HUD ──────────────────────────────────────────────────────────────────────

fn hud_lines(world: &GameWorld) -> Vec<TextLine> {
    let separator = "-".repeat(world.config.screen.width);
    let p = &world.player;

    let mut stats = TextLine::default();
    stats.push(format!("HEALTH: {}  ", p.health), C_HUD_HEALTH);
    stats.push("|  ", ColorId::Default);
    stats.push(format!("AMMO: {}  ", p.ammo), C_HUD_AMMO);
    stats.push("|  ", ColorId::Default);
    stats.push(format!("SCORE: {}", p.score), C_HUD_SCORE);

    vec![
        TextLine::plain(separator.clone()),
        stats,
        TextLine::plain(separator),
    ]
}

// ── Minimap ──────────────────────────────────────────────────────────────────

fn minimap_lines(world: &GameWorld) -> Vec<TextLine> {
    let map = &world.map;
    let player_cell = world.player.cell();

    let mut lines = vec![TextLine::default(), TextLine::plain("--- Mini Map ---")];
    for y in 0..map.height() as i32 {
        let mut line = TextLine::default();
        for x in 0..map.width() as i32 {
            let (glyph, color) = minimap_cell(world, GridPos::new(x, y), player_cell);
            line.push(glyph.to_string(), color);
        }
        lines.push(line);
    }
    lines
}

fn minimap_cell(world: &GameWorld, pos: GridPos, player_cell: GridPos) -> (char, ColorId) {
    if pos == player_cell {
        return ('P', C_MINIMAP_PLAYER);
    }
    if let Some(door) = world.map.doors().get(pos) {
        return if door.is_open {
            ('O', C_DOOR_OPEN)
        } else {
            ('D', C_DOOR_CLOSED)
        };
    }
    let entity = world
        .entities
        .iter()
        .find(|e| e.active && GridPos::containing(e.x, e.y) == pos);
    if let Some(entity) = entity {
        return entity.appearance();
    }
    match world.map.tile_at(pos.x, pos.y) {
        Tile::Wall => ('#', ColorId::Default),
        _ => (' ', ColorId::Default),
    }
}

// ── Status ───────────────────────────────────────────────────────────────────

fn status_lines(world: &GameWorld) -> Vec<TextLine> {
    let p = &world.player;
    let position = format!(
        "Player X: {:.1}, Y: {:.1}, Angle: {:.2} (deg: {:.1})",
        p.x,
        p.y,
        p.angle,
        p.angle.to_degrees()
    );
    let controls = match world.state {
        GameState::Menu => "Controls: ENTER/SPACE (Start), X (Exit)",
        GameState::Playing => {
            "Controls: WASD (Move), QE (Rotate), F (Interact), SPACE (Shoot), X (Exit)"
        }
        GameState::GameOver | GameState::Win => "Controls: R (Restart), X (Exit)",
    };
    vec![
        TextLine::plain(position),
        TextLine::colored(controls, C_HINT),
    ]
}
