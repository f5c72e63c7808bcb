use ascii_raycaster::config::EngineConfig;
use ascii_raycaster::entities::{CollectibleKind, Entity, Player, Projectile};
use ascii_raycaster::frame::{ColorId, Frame};
use ascii_raycaster::map::Level;
use ascii_raycaster::raycast::{cast_view, Camera, DepthBuffer};
use ascii_raycaster::sprites::{collect, draw, draw_all, sort_far_to_near, Sprite, SpriteSource};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const W: usize = 100;
const H: usize = 30;
const MAX: f64 = 20.0;

/// Facing east from (1.5, 2.5) a one-cell pillar at x = 4 fills the middle
/// third of the view at depth 2.5.
const PILLAR: &str = "\
##########
#........#
#P..#....#
#........#
##########";

fn make_camera(x: f64, y: f64, angle: f64) -> Camera {
    let player = Player {
        x,
        y,
        angle,
        health: 100,
        ammo: 10,
        score: 0,
    };
    Camera::new(&player, EngineConfig::default().camera.plane_scale())
}

fn make_projectile(x: f64, y: f64) -> Projectile {
    Projectile {
        x,
        y,
        dir_x: 1.0,
        dir_y: 0.0,
        speed: 8.0,
        travelled: 1.0,
        active: true,
    }
}

fn columns_with(frame: &Frame, glyph: char) -> Vec<usize> {
    (0..frame.width())
        .filter(|&x| (0..frame.height()).any(|y| frame.get(x, y).map(|c| c.glyph) == Some(glyph)))
        .collect()
}

// ── collect ───────────────────────────────────────────────────────────────────

#[test]
fn collect_skips_inactive_near_and_far() {
    let camera = make_camera(0.0, 0.0, 0.0);
    let mut inactive = Entity::enemy(3.0, 0.0, 50, 1.0);
    inactive.active = false;
    let entities = vec![
        inactive,
        Entity::enemy(0.05, 0.0, 50, 1.0),
        Entity::enemy(25.0, 0.0, 50, 1.0),
        Entity::collectible(4.0, 0.0, CollectibleKind::Ammo),
    ];
    let sprites = collect(&camera, &entities, &[], MAX);
    assert_eq!(sprites.len(), 1);
    assert_eq!(sprites[0].source, SpriteSource::Entity(3));
    assert_eq!(sprites[0].glyph, '!');
}

#[test]
fn projectiles_render_as_stars() {
    let camera = make_camera(0.0, 0.0, 0.0);
    let mut spent = make_projectile(5.0, 0.0);
    spent.active = false;
    let sprites = collect(&camera, &[], &[spent, make_projectile(2.0, 0.0)], MAX);
    assert_eq!(sprites.len(), 1);
    assert_eq!(sprites[0].source, SpriteSource::Projectile(1));
    assert_eq!((sprites[0].glyph, sprites[0].color), ('*', ColorId::White));
}

// ── Ordering ──────────────────────────────────────────────────────────────────

#[test]
fn sort_is_far_to_near_with_stable_ties() {
    let camera = make_camera(0.0, 0.0, 0.0);
    let entities = vec![
        Entity::enemy(2.0, 0.0, 50, 1.0),
        Entity::enemy(0.0, 5.0, 50, 1.0),
        Entity::enemy(5.0, 0.0, 50, 1.0),
    ];
    let projectiles = vec![make_projectile(0.0, -5.0)];
    let mut sprites = collect(&camera, &entities, &projectiles, MAX);
    sort_far_to_near(&mut sprites);

    let order: Vec<_> = sprites.iter().map(|s| s.source).collect();
    assert_eq!(
        order,
        vec![
            SpriteSource::Entity(1),
            SpriteSource::Entity(2),
            SpriteSource::Projectile(0),
            SpriteSource::Entity(0),
        ]
    );
}

#[test]
fn sort_does_not_depend_on_input_order() {
    let camera = make_camera(0.0, 0.0, 0.0);
    let entities: Vec<_> = (0..6)
        .map(|i| Entity::enemy(3.0 + (i % 3) as f64, 0.1 * i as f64, 50, 1.0))
        .collect();
    let mut expected = collect(&camera, &entities, &[], MAX);
    sort_far_to_near(&mut expected);

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10 {
        let mut shuffled = expected.clone();
        shuffled.shuffle(&mut rng);
        sort_far_to_near(&mut shuffled);
        assert_eq!(shuffled, expected);
    }
}

#[test]
fn nearer_sprite_wins_the_overlap() {
    let camera = make_camera(0.0, 0.0, 0.0);
    let entities = vec![
        Entity::enemy(3.0, 0.0, 50, 1.0),
        Entity::collectible(6.0, 0.0, CollectibleKind::Health),
    ];
    let depth = DepthBuffer::new(W, MAX);

    // Whatever order they arrive in, the nearer enemy ends up on top
    for sprites in [
        collect(&camera, &entities, &[], MAX),
        collect(&camera, &entities, &[], MAX).into_iter().rev().collect(),
    ] {
        let mut frame = Frame::new(W, H);
        draw_all(&mut frame, &depth, &camera, sprites);
        assert_eq!(frame.get(W / 2, H / 2).map(|c| c.glyph), Some('M'));
    }
}

// ── Projection ────────────────────────────────────────────────────────────────

#[test]
fn sprite_straight_ahead_is_centred() {
    let camera = make_camera(0.0, 0.0, 0.0);
    let sprites = collect(&camera, &[Entity::enemy(3.0, 0.0, 50, 1.0)], &[], MAX);
    let mut frame = Frame::new(W, H);
    let drawn = draw(&mut frame, &DepthBuffer::new(W, MAX), &camera, &sprites[0]);

    let cols = columns_with(&frame, 'M');
    assert_eq!(cols.len(), drawn);
    let first = cols[0];
    let last = cols[cols.len() - 1];
    assert!(first < W / 2 && last >= W / 2);
    assert!((W / 2 - first).abs_diff(last + 1 - W / 2) <= 1);
}

#[test]
fn sprite_behind_the_camera_is_not_drawn() {
    let camera = make_camera(0.0, 0.0, 0.0);
    let sprites = collect(&camera, &[Entity::enemy(-3.0, 0.0, 50, 1.0)], &[], MAX);
    let mut frame = Frame::new(W, H);
    assert_eq!(draw(&mut frame, &DepthBuffer::new(W, MAX), &camera, &sprites[0]), 0);
    assert_eq!(frame, Frame::new(W, H));
}

#[test]
fn projectiles_are_smaller_than_entities() {
    let camera = make_camera(0.0, 0.0, 0.0);
    let depth = DepthBuffer::new(W, MAX);
    let entity = collect(&camera, &[Entity::enemy(3.0, 0.0, 50, 1.0)], &[], MAX);
    let shot = collect(&camera, &[], &[make_projectile(3.0, 0.0)], MAX);

    let entity_cols = draw(&mut Frame::new(W, H), &depth, &camera, &entity[0]);
    let shot_cols = draw(&mut Frame::new(W, H), &depth, &camera, &shot[0]);
    assert!(shot_cols >= 1);
    assert!(shot_cols < entity_cols);
}

#[test]
fn closer_sprites_are_wider() {
    let camera = make_camera(0.0, 0.0, 0.0);
    let depth = DepthBuffer::new(W, MAX);
    let near = collect(&camera, &[Entity::enemy(2.0, 0.0, 50, 1.0)], &[], MAX);
    let far = collect(&camera, &[Entity::enemy(8.0, 0.0, 50, 1.0)], &[], MAX);
    let near_cols = draw(&mut Frame::new(W, H), &depth, &camera, &near[0]);
    let far_cols = draw(&mut Frame::new(W, H), &depth, &camera, &far[0]);
    assert!(near_cols > far_cols);
}

// ── Occlusion ─────────────────────────────────────────────────────────────────

#[test]
fn sprite_behind_pillar_is_hidden() {
    let map = Level::parse(PILLAR).unwrap().map;
    let camera = make_camera(1.5, 2.5, 0.0);
    let depth = DepthBuffer::from_hits(&cast_view(&map, &camera, W, MAX));
    let sprites = collect(&camera, &[Entity::enemy(6.5, 2.5, 50, 1.0)], &[], MAX);

    let mut frame = Frame::new(W, H);
    assert_eq!(draw(&mut frame, &depth, &camera, &sprites[0]), 0);
}

#[test]
fn sprite_in_front_of_pillar_is_drawn() {
    let map = Level::parse(PILLAR).unwrap().map;
    let camera = make_camera(1.5, 2.5, 0.0);
    let depth = DepthBuffer::from_hits(&cast_view(&map, &camera, W, MAX));
    let sprites = collect(&camera, &[Entity::enemy(3.5, 2.5, 50, 1.0)], &[], MAX);

    let mut frame = Frame::new(W, H);
    assert!(draw(&mut frame, &depth, &camera, &sprites[0]) > 10);
}

#[test]
fn partially_occluded_sprite_keeps_visible_columns() {
    let camera = make_camera(0.0, 0.0, 0.0);
    let mut depth = DepthBuffer::new(W, MAX);
    for col in 0..W / 2 {
        depth.set(col, 1.0);
    }
    let sprites = collect(&camera, &[Entity::enemy(3.0, 0.0, 50, 1.0)], &[], MAX);

    let mut frame = Frame::new(W, H);
    let drawn = draw(&mut frame, &depth, &camera, &sprites[0]);
    let cols = columns_with(&frame, 'M');
    assert!(drawn > 0);
    assert_eq!(cols.len(), drawn);
    assert!(cols.iter().all(|&c| c >= W / 2));
}

#[test]
fn drawn_columns_always_pass_the_depth_test() {
    let mut rng = StdRng::seed_from_u64(42);
    let camera = make_camera(0.0, 0.0, 0.0);

    for _ in 0..100 {
        let mut depth = DepthBuffer::new(W, MAX);
        for col in 0..W {
            depth.set(col, rng.gen_range(0.5..10.0));
        }
        let x = rng.gen_range(0.5..12.0);
        let y = rng.gen_range(-4.0..4.0);
        let sprites: Vec<Sprite> = collect(&camera, &[Entity::enemy(x, y, 50, 1.0)], &[], MAX);
        let Some(sprite) = sprites.first() else {
            continue;
        };

        let mut frame = Frame::new(W, H);
        draw(&mut frame, &depth, &camera, sprite);
        let (_, z) = camera.to_camera_space(sprite.x, sprite.y);
        for col in columns_with(&frame, 'M') {
            let wall = depth.get(col).unwrap();
            assert!(z < wall, "column {col}: sprite depth {z} vs wall {wall}");
        }
    }
}
