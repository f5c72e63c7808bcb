//! Game logic: the simulation step and the operations it is made of.
//!
//! `step` is the only entry point the tick driver calls.  The smaller
//! functions are public so each rule can be exercised on its own.  Nothing
//! here touches the terminal or the clock; time arrives as `dt`.

use tracing::{debug, info, trace};

use crate::config::WeaponModel;
use crate::entities::{CollectibleKind, Entity, EntityKind, GameState, GridPos, Projectile};
use crate::input::Command;
use crate::map::Map;
use crate::world::GameWorld;

// ── Results ──────────────────────────────────────────────────────────────────

/// What a single tick produced besides the mutated world.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepOutcome {
    /// The player took damage this tick.
    pub alert: bool,
    pub damage_taken: u32,
    /// New state if the state machine moved this tick.
    pub transition: Option<GameState>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interaction {
    Door { pos: GridPos, open: bool },
    Pickup { slot: usize },
    Nothing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    Damaged,
    Killed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FireOutcome {
    NoAmmo,
    /// Every projectile slot is busy; the shot is dropped and no ammo spent.
    PoolExhausted,
    Spawned { slot: usize },
    Hit { slot: usize, outcome: HitOutcome },
    Wall,
    Miss,
}

/// Where a marched segment ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum March {
    Clear { x: f64, y: f64 },
    Wall { x: f64, y: f64 },
    Enemy { slot: usize, x: f64, y: f64 },
}

// ── Tick ─────────────────────────────────────────────────────────────────────

/// Advance the world by one tick.
///
/// Order: command, projectiles, enemies, then the game-over / win check, so
/// a lethal hit and the resulting state change land in the same tick.
pub fn step(world: &mut GameWorld, key: Option<char>, dt: f64) -> StepOutcome {
    let dt = sanitize_dt(dt, world.config.pacing.max_dt);
    let command = key.and_then(Command::from_key);
    let mut outcome = StepOutcome::default();
    trace!(dt, ?command, state = ?world.state, "tick");

    if command == Some(Command::Quit) {
        info!(state = ?world.state, "quit requested");
        world.running = false;
        return outcome;
    }

    match world.state {
        GameState::Menu => {
            if matches!(command, Some(Command::Start) | Some(Command::Fire)) {
                outcome.transition = Some(restart(world));
            }
        }
        GameState::GameOver | GameState::Win => {
            if command == Some(Command::Restart) {
                outcome.transition = Some(restart(world));
            }
        }
        GameState::Playing => {
            world.clock += dt;
            if let Some(command) = command {
                apply_command(world, command);
            }
            advance_projectiles(world, dt);
            let damage = update_enemies(world, dt);
            outcome.damage_taken = damage;
            outcome.alert = damage > 0;
            outcome.transition = evaluate_transition(world);
        }
    }

    outcome
}

fn sanitize_dt(dt: f64, max_dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(max_dt)
    } else {
        0.0
    }
}

/// Reset the level and enter `Playing`.
pub fn restart(world: &mut GameWorld) -> GameState {
    let from = world.state;
    world.reset_level();
    world.state = GameState::Playing;
    info!(?from, "game started");
    GameState::Playing
}

/// Apply the end-of-tick transition rules.  Only meaningful while playing.
pub fn evaluate_transition(world: &mut GameWorld) -> Option<GameState> {
    if world.state != GameState::Playing {
        return None;
    }
    let next = if world.player.health == 0 {
        GameState::GameOver
    } else if world.is_cleared() {
        GameState::Win
    } else {
        return None;
    };
    info!(?next, score = world.player.score, "game state changed");
    world.state = next;
    Some(next)
}

// ── Commands ─────────────────────────────────────────────────────────────────

pub fn apply_command(world: &mut GameWorld, command: Command) {
    let step = world.config.player.move_step;
    let turn = world.config.player.rotation_step;
    let (fx, fy) = world.player.forward();
    let (rx, ry) = world.player.right();

    match command {
        Command::Forward => move_player(world, fx * step, fy * step),
        Command::Backward => move_player(world, -fx * step, -fy * step),
        Command::StrafeLeft => move_player(world, -rx * step, -ry * step),
        Command::StrafeRight => move_player(world, rx * step, ry * step),
        Command::TurnLeft => world.player.rotate(-turn),
        Command::TurnRight => world.player.rotate(turn),
        Command::Interact => {
            interact(world);
        }
        Command::Fire => {
            fire(world);
        }
        Command::Start | Command::Restart | Command::Quit => {}
    }
}

fn move_player(world: &mut GameWorld, dx: f64, dy: f64) {
    let p = &world.player;
    let (x, y) = resolve_movement(&world.map, p.x, p.y, p.x + dx, p.y + dy);
    world.player.x = x;
    world.player.y = y;
}

/// Resolve a move from `(x, y)` to `(nx, ny)` one axis at a time.
///
/// Each axis is tested with the other axis still at its old coordinate, so
/// pushing diagonally into a wall slides along it.  When both axes are free
/// on their own but the diagonal cell is solid (an outside corner), only the
/// x move is kept.
pub fn resolve_movement(map: &Map, x: f64, y: f64, nx: f64, ny: f64) -> (f64, f64) {
    let x_free = map.is_passable_at(nx, y);
    let y_free = map.is_passable_at(x, ny);
    match (x_free, y_free) {
        (true, true) if !map.is_passable_at(nx, ny) => (nx, y),
        (true, true) => (nx, ny),
        (true, false) => (nx, y),
        (false, true) => (x, ny),
        (false, false) => (x, y),
    }
}

// ── Interaction ──────────────────────────────────────────────────────────────

/// Toggle the first door in reach, or failing that pick up the first
/// collectible in reach.  At most one thing happens per call.
///
/// An open door is not closed while the player or an active enemy stands in
/// its cell; such a door is skipped.
pub fn interact(world: &mut GameWorld) -> Interaction {
    let radius = world.config.player.door_radius;
    let player = &world.player;
    let entities = &world.entities;
    let door = world.map.doors().iter().find(|door| {
        let (cx, cy) = door.pos.center();
        if player.distance_to(cx, cy) >= radius {
            return false;
        }
        !(door.is_open && cell_occupied(door.pos, player.cell(), entities))
    });

    if let Some(pos) = door.map(|d| d.pos) {
        if let Some(open) = world.map.toggle_door(pos.x, pos.y) {
            return Interaction::Door { pos, open };
        }
    }

    let radius = world.config.player.pickup_radius;
    let slot = world.entities.iter().position(|e| {
        e.active && e.is_collectible() && world.player.distance_to(e.x, e.y) < radius
    });
    match slot {
        Some(slot) if pick_up(world, slot) => Interaction::Pickup { slot },
        _ => Interaction::Nothing,
    }
}

fn cell_occupied(pos: GridPos, player_cell: GridPos, entities: &[Entity]) -> bool {
    player_cell == pos
        || entities
            .iter()
            .any(|e| e.active && e.is_enemy() && GridPos::containing(e.x, e.y) == pos)
}

/// Apply a collectible's effect and deactivate it.  Inactive slots, enemies
/// and out-of-range slots are left alone and return `false`.
pub fn pick_up(world: &mut GameWorld, slot: usize) -> bool {
    let Some(entity) = world.entities.get_mut(slot) else {
        return false;
    };
    if !entity.active {
        return false;
    }
    let EntityKind::Collectible(kind) = entity.kind else {
        return false;
    };

    let cfg = &world.config.player;
    let player = &mut world.player;
    match kind {
        CollectibleKind::Health => {
            player.health = (player.health + cfg.health_pickup).min(cfg.max_health);
        }
        CollectibleKind::Ammo => {
            player.ammo += cfg.ammo_pickup;
        }
    }
    entity.active = false;
    debug!(slot, ?kind, health = player.health, ammo = player.ammo, "picked up");
    true
}

// ── Combat ───────────────────────────────────────────────────────────────────

/// Fire the weapon with the session's weapon model.
pub fn fire(world: &mut GameWorld) -> FireOutcome {
    if world.player.ammo == 0 {
        debug!("fire with empty magazine");
        return FireOutcome::NoAmmo;
    }
    let outcome = match world.config.weapon.model {
        WeaponModel::Hitscan => {
            world.player.ammo -= 1;
            fire_hitscan(world)
        }
        WeaponModel::Projectile => match world.projectiles.iter().position(|p| !p.active) {
            Some(slot) => {
                world.player.ammo -= 1;
                let (dx, dy) = world.player.forward();
                world.projectiles[slot] = Projectile {
                    x: world.player.x,
                    y: world.player.y,
                    dir_x: dx,
                    dir_y: dy,
                    speed: world.config.weapon.projectile_speed,
                    travelled: 0.0,
                    active: true,
                };
                FireOutcome::Spawned { slot }
            }
            None => FireOutcome::PoolExhausted,
        },
    };
    debug!(?outcome, ammo = world.player.ammo, "fired");
    outcome
}

fn fire_hitscan(world: &mut GameWorld) -> FireOutcome {
    let weapon = &world.config.weapon;
    let (dx, dy) = world.player.forward();
    let result = march(
        &world.map,
        &world.entities,
        (world.player.x, world.player.y),
        (dx, dy),
        weapon.range,
        weapon.march_step,
        weapon.hit_radius,
        true,
    );
    match result {
        March::Clear { .. } => FireOutcome::Miss,
        March::Wall { .. } => FireOutcome::Wall,
        March::Enemy { slot, .. } => match damage_enemy(world, slot) {
            Some(outcome) => FireOutcome::Hit { slot, outcome },
            None => FireOutcome::Miss,
        },
    }
}

/// Sample a segment every `step` units and stop at the first solid cell or
/// the first active enemy within `hit_radius` (lowest slot wins).  Walls are
/// tested before enemies at each sample.
#[allow(clippy::too_many_arguments)]
pub fn march(
    map: &Map,
    entities: &[Entity],
    origin: (f64, f64),
    dir: (f64, f64),
    distance: f64,
    step: f64,
    hit_radius: f64,
    include_origin: bool,
) -> March {
    let (ox, oy) = origin;
    let distance = if distance.is_finite() { distance.max(0.0) } else { 0.0 };
    let step = if step > 0.0 { step } else { distance.max(1.0) };
    let samples = (distance / step).ceil() as usize;
    let first = usize::from(!include_origin);

    for i in first..=samples {
        let t = (i as f64 * step).min(distance);
        let (x, y) = (ox + dir.0 * t, oy + dir.1 * t);
        if !map.is_passable_at(x, y) {
            return March::Wall { x, y };
        }
        let hit = entities.iter().position(|e| {
            e.active && e.is_enemy() && (e.x - x).hypot(e.y - y) < hit_radius
        });
        if let Some(slot) = hit {
            return March::Enemy { slot, x, y };
        }
    }

    March::Clear {
        x: ox + dir.0 * distance,
        y: oy + dir.1 * distance,
    }
}

/// Apply one weapon hit to the enemy in `slot`.  A kill deactivates the slot
/// and awards the kill reward; hitting an inactive slot does nothing.
pub fn damage_enemy(world: &mut GameWorld, slot: usize) -> Option<HitOutcome> {
    let damage = world.config.weapon.damage;
    let entity = world.entities.get_mut(slot).filter(|e| e.active)?;
    let EntityKind::Enemy(enemy) = &mut entity.kind else {
        return None;
    };

    enemy.health -= damage;
    if enemy.health > 0 {
        debug!(slot, health = enemy.health, "enemy hit");
        return Some(HitOutcome::Damaged);
    }
    entity.active = false;
    world.player.score += world.config.weapon.kill_reward;
    debug!(slot, score = world.player.score, "enemy killed");
    Some(HitOutcome::Killed)
}

/// Move every live projectile by `speed * dt`, retiring it on a wall, an
/// enemy, or once it has covered the weapon range.
pub fn advance_projectiles(world: &mut GameWorld, dt: f64) {
    let range = world.config.weapon.range;
    let step = world.config.weapon.march_step;
    let hit_radius = world.config.weapon.hit_radius;

    for slot in 0..world.projectiles.len() {
        let proj = world.projectiles[slot].clone();
        if !proj.active {
            continue;
        }
        let distance = (proj.speed * dt).min((range - proj.travelled).max(0.0));
        let result = march(
            &world.map,
            &world.entities,
            (proj.x, proj.y),
            (proj.dir_x, proj.dir_y),
            distance,
            step,
            hit_radius,
            proj.travelled == 0.0,
        );

        match result {
            March::Clear { x, y } => {
                let p = &mut world.projectiles[slot];
                p.x = x;
                p.y = y;
                p.travelled += distance;
                if p.travelled >= range {
                    p.active = false;
                }
            }
            March::Wall { .. } => {
                world.projectiles[slot].active = false;
            }
            March::Enemy { slot: target, .. } => {
                world.projectiles[slot].active = false;
                damage_enemy(world, target);
            }
        }
    }
}

// ── Enemy AI ─────────────────────────────────────────────────────────────────

/// Straight-line pursuit and melee attacks.  Returns the damage dealt to the
/// player this tick.
pub fn update_enemies(world: &mut GameWorld, dt: f64) -> u32 {
    let cfg = world.config.enemy.clone();
    let now = world.clock;
    let mut dealt = 0;

    for slot in 0..world.entities.len() {
        let (px, py) = (world.player.x, world.player.y);
        let entity = &mut world.entities[slot];
        if !entity.active {
            continue;
        }
        let EntityKind::Enemy(enemy) = &mut entity.kind else {
            continue;
        };

        let (dx, dy) = (px - entity.x, py - entity.y);
        let distance = dx.hypot(dy);
        if distance > cfg.too_close {
            let advance = (cfg.speed * dt).min(distance - cfg.too_close);
            let nx = entity.x + dx / distance * advance;
            let ny = entity.y + dy / distance * advance;
            if world.map.is_passable_at(nx, ny) {
                entity.x = nx;
                entity.y = ny;
            }
        }

        let distance = (px - entity.x).hypot(py - entity.y);
        if distance <= cfg.attack_range && enemy.can_attack(now) {
            enemy.last_attack_at = Some(now);
            world.player.health = world.player.health.saturating_sub(cfg.attack_damage);
            dealt += cfg.attack_damage;
            debug!(slot, health = world.player.health, "enemy attacked");
        }
    }

    dealt
}
