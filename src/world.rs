//! The `GameWorld` aggregate: everything one session owns.
//!
//! The simulation step mutates it, the compositor only reads it.  Entities
//! and projectiles live in slot pools: a slot is deactivated, never removed,
//! so indices taken during a tick stay valid until the next level reset.

use tracing::info;

use crate::config::EngineConfig;
use crate::entities::{
    CollectibleKind, Entity, GameState, GridPos, Player, Projectile, Spawn, SpawnKind,
};
use crate::map::{Level, Map};

#[derive(Clone, Debug)]
pub struct GameWorld {
    pub config: EngineConfig,
    pub map: Map,
    pub player: Player,
    pub entities: Vec<Entity>,
    pub projectiles: Vec<Projectile>,
    pub state: GameState,
    /// Seconds of simulated time since the level started.
    pub clock: f64,
    /// Cleared by the quit command; the tick driver stops on the next tick.
    pub running: bool,
    player_start: GridPos,
    spawns: Vec<Spawn>,
}

impl GameWorld {
    /// Build a world in the `Menu` state from a parsed level.
    pub fn new(level: Level, config: EngineConfig) -> Self {
        let Level {
            map,
            player_start,
            spawns,
        } = level;
        let mut world = Self {
            player: spawn_player(player_start, &config),
            entities: Vec::new(),
            projectiles: Vec::new(),
            state: GameState::Menu,
            clock: 0.0,
            running: true,
            config,
            map,
            player_start,
            spawns,
        };
        world.reset_level();
        world
    }

    /// Put the player, entity store, projectile pool and doors back to their
    /// load-time state.  The map grid itself never changes.
    pub fn reset_level(&mut self) {
        self.player = spawn_player(self.player_start, &self.config);
        self.entities = self
            .spawns
            .iter()
            .map(|spawn| spawn_entity(spawn, &self.config))
            .collect();
        self.projectiles = vec![Projectile::default(); self.config.weapon.projectile_capacity];
        self.map.reset_doors();
        self.clock = 0.0;
        info!(
            entities = self.entities.len(),
            doors = self.map.doors().len(),
            "level reset"
        );
    }

    pub fn active_enemies(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.active && e.is_enemy())
            .count()
    }

    pub fn remaining_collectibles(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.active && e.is_collectible())
            .count()
    }

    /// No collectible left and no enemy standing.
    pub fn is_cleared(&self) -> bool {
        self.remaining_collectibles() == 0 && self.active_enemies() == 0
    }

    pub fn active_projectiles(&self) -> usize {
        self.projectiles.iter().filter(|p| p.active).count()
    }
}

fn spawn_player(start: GridPos, config: &EngineConfig) -> Player {
    let (x, y) = start.center();
    Player {
        x,
        y,
        angle: crate::entities::normalize_angle(config.player.start_angle),
        health: config.player.start_health,
        ammo: config.player.start_ammo,
        score: 0,
    }
}

fn spawn_entity(spawn: &Spawn, config: &EngineConfig) -> Entity {
    let (x, y) = spawn.pos.center();
    match spawn.kind {
        SpawnKind::Health => Entity::collectible(x, y, CollectibleKind::Health),
        SpawnKind::Ammo => Entity::collectible(x, y, CollectibleKind::Ammo),
        SpawnKind::Enemy => Entity::enemy(
            x,
            y,
            config.enemy.max_health,
            config.enemy.attack_cooldown,
        ),
    }
}
