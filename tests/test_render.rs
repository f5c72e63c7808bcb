use std::f64::consts::PI;

use ascii_raycaster::config::EngineConfig;
use ascii_raycaster::entities::{EntityKind, GameState};
use ascii_raycaster::frame::{ColorId, Frame};
use ascii_raycaster::map::Level;
use ascii_raycaster::render::compose;
use ascii_raycaster::world::GameWorld;

fn make_world(source: &str) -> GameWorld {
    let level = Level::parse(source).expect("test map is valid");
    let mut world = GameWorld::new(level, EngineConfig::default());
    world.state = GameState::Playing;
    world.player.angle = 0.0;
    world
}

fn default_world() -> GameWorld {
    let level = Level::default_level().expect("bundled level parses");
    GameWorld::new(level, EngineConfig::default())
}

fn grid_contains(frame: &Frame, needle: &str) -> bool {
    (0..frame.height()).any(|y| frame.row_text(y).contains(needle))
}

fn grid_has_glyph(frame: &Frame, glyph: char) -> bool {
    (0..frame.height()).any(|y| frame.row_text(y).contains(glyph))
}

// ── Grid ──────────────────────────────────────────────────────────────────────

#[test]
fn frame_matches_configured_screen() {
    let frame = compose(&default_world());
    assert_eq!(frame.width(), 100);
    assert_eq!(frame.height(), 30);
    assert!(!frame.alert);
}

#[test]
fn compose_is_pure() {
    let world = default_world();
    assert_eq!(compose(&world), compose(&world));
}

#[test]
fn wall_right_in_front_fills_the_column() {
    let mut world = make_world("#####\n#P..#\n#...#\n#####");
    world.player.angle = PI; // facing the west wall half a cell away
    let frame = compose(&world);
    for y in 0..frame.height() {
        let cell = frame.get(50, y).unwrap();
        assert_eq!(cell.glyph, '█');
        assert_eq!(cell.color, ColorId::Blue);
    }
}

#[test]
fn floor_and_ceiling_frame_a_distant_wall() {
    let corridor = format!("{}\n#P{}#\n{}", "#".repeat(16), ".".repeat(13), "#".repeat(16));
    let world = make_world(&corridor);
    let frame = compose(&world);
    let top = frame.get(50, 0).unwrap();
    let bottom = frame.get(50, 29).unwrap();
    assert_eq!((top.glyph, top.color), ('#', ColorId::DarkGray));
    assert_eq!((bottom.glyph, bottom.color), ('#', ColorId::LightGray));
    assert_eq!(frame.get(50, 15).unwrap().glyph, '░');
}

#[test]
fn visible_enemy_is_drawn() {
    let world = make_world("##########\n#P....E..#\n##########");
    assert!(grid_has_glyph(&compose(&world), 'M'));
}

// ── Overlays ──────────────────────────────────────────────────────────────────

#[test]
fn menu_shows_title_banner() {
    let frame = compose(&default_world());
    assert!(grid_contains(&frame, "ASCII  RAYCASTER"));
    assert!(grid_contains(&frame, "ENTER / SPACE : Start"));
}

#[test]
fn playing_has_no_overlay() {
    let mut world = default_world();
    world.state = GameState::Playing;
    let frame = compose(&world);
    assert!(!grid_contains(&frame, "RAYCASTER"));
    assert!(!grid_has_glyph(&frame, '╔'));
}

#[test]
fn game_over_shows_final_score() {
    let mut world = default_world();
    world.state = GameState::GameOver;
    world.player.score = 300;
    let frame = compose(&world);
    assert!(grid_contains(&frame, "GAME  OVER"));
    assert!(grid_contains(&frame, "Final Score:    300"));
}

#[test]
fn win_shows_banner() {
    let mut world = default_world();
    world.state = GameState::Win;
    assert!(grid_contains(&compose(&world), "YOU  WIN!"));
}

// ── HUD, minimap and status ───────────────────────────────────────────────────

#[test]
fn hud_reports_player_stats() {
    let mut world = default_world();
    world.player.health = 75;
    world.player.ammo = 3;
    world.player.score = 200;
    let frame = compose(&world);
    assert_eq!(frame.lines[0].text(), "-".repeat(100));
    assert_eq!(frame.lines[1].text(), "HEALTH: 75  |  AMMO: 3  |  SCORE: 200");
    assert_eq!(frame.lines[2].text(), "-".repeat(100));
}

#[test]
fn minimap_marks_player_doors_and_entities() {
    let mut world = default_world();
    let frame = compose(&world);
    assert_eq!(frame.lines[4].text(), "--- Mini Map ---");

    let minimap: Vec<String> = frame.lines[5..25].iter().map(|l| l.text()).collect();
    assert_eq!(minimap.len(), 20);
    assert_eq!(minimap[0], "#".repeat(20));
    assert_eq!(minimap[2].chars().nth(2), Some('P'));
    assert_eq!(minimap[7].chars().nth(7), Some('D'));
    assert_eq!(minimap[3].chars().nth(16), Some('M'));
    assert_eq!(minimap[1].chars().nth(9), Some('+'));

    world.map.toggle_door(7, 7);
    // Slot 1 is the enemy at (16, 3)
    if let EntityKind::Enemy(enemy) = &mut world.entities[1].kind {
        enemy.health = 10;
    }
    let frame = compose(&world);
    assert_eq!(frame.lines[12].text().chars().nth(7), Some('O'));
    assert_eq!(frame.lines[8].text().chars().nth(16), Some('m'));
}

#[test]
fn player_in_an_open_door_is_shown_on_the_minimap() {
    let mut world = default_world();
    world.map.toggle_door(7, 7);
    world.player.x = 7.5;
    world.player.y = 7.5;
    let frame = compose(&world);
    assert_eq!(frame.lines[12].text().chars().nth(7), Some('P'));
    assert_eq!(frame.lines[7].text().chars().nth(2), Some(' '));
}

#[test]
fn nan_fov_is_replaced_before_rendering() {
    let mut config = EngineConfig::default();
    config.camera.fov_degrees = f64::NAN;
    let level = Level::default_level().expect("bundled level parses");
    let mut world = GameWorld::new(level, config.validated());
    world.state = GameState::Playing;
    let frame = compose(&world);
    assert!(['█', '▓', '▒'].iter().any(|&g| grid_has_glyph(&frame, g)));
}

#[test]
fn status_lines_follow_state() {
    let mut world = default_world();
    let menu = compose(&world);
    let last = menu.lines.last().unwrap().text();
    assert!(last.contains("ENTER/SPACE"));

    world.state = GameState::Playing;
    let playing = compose(&world);
    let n = playing.lines.len();
    assert!(playing.lines[n - 2].text().starts_with("Player X: 2.5, Y: 2.5"));
    assert!(playing.lines[n - 1].text().contains("WASD"));
}
