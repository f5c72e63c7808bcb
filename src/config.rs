//! Engine tunables.
//!
//! Everything the simulation and compositor need to know about screen size,
//! camera, movement, combat and pacing lives in one `EngineConfig`.  The
//! binary builds it from CLI flags; tests build it from `Default`.

use std::f64::consts::PI;
use std::time::Duration;

// ── Weapon model ─────────────────────────────────────────────────────────────

/// How the player's weapon resolves a shot.  Chosen once per session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WeaponModel {
    /// A ray marched instantly from the player along the view direction.
    Hitscan,
    /// A projectile spawned into the pool and advanced every tick.
    #[default]
    Projectile,
}

// ── Nested sections ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct ScreenConfig {
    pub width: usize,
    pub height: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub fov_degrees: f64,
    pub max_render_distance: f64,
}

impl CameraConfig {
    /// Length of the camera plane relative to a unit forward vector.
    pub fn plane_scale(&self) -> f64 {
        (self.fov_degrees.to_radians() / 2.0).tan()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    pub start_health: u32,
    pub max_health: u32,
    pub start_ammo: u32,
    /// Distance covered by one movement key press.
    pub move_step: f64,
    /// Radians turned by one rotation key press.
    pub rotation_step: f64,
    pub start_angle: f64,
    pub door_radius: f64,
    pub pickup_radius: f64,
    pub health_pickup: u32,
    pub ammo_pickup: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeaponConfig {
    pub model: WeaponModel,
    pub damage: i32,
    pub kill_reward: u32,
    /// Hitscan reach, and the distance a projectile travels before it retires.
    pub range: f64,
    /// Distance between successive samples when marching a shot.
    pub march_step: f64,
    pub hit_radius: f64,
    pub projectile_speed: f64,
    pub projectile_capacity: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyConfig {
    pub max_health: i32,
    pub speed: f64,
    pub too_close: f64,
    pub attack_range: f64,
    pub attack_damage: u32,
    pub attack_cooldown: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PacingConfig {
    pub ticks_per_second: u32,
    /// Upper bound applied to every measured `dt`, in seconds.
    pub max_dt: f64,
}

impl PacingConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.ticks_per_second.max(1) as f64)
    }
}

// ── Master config ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub screen: ScreenConfig,
    pub camera: CameraConfig,
    pub player: PlayerConfig,
    pub weapon: WeaponConfig,
    pub enemy: EnemyConfig,
    pub pacing: PacingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            screen: ScreenConfig {
                width: 100,
                height: 30,
            },
            camera: CameraConfig {
                fov_degrees: 66.0,
                max_render_distance: 20.0,
            },
            player: PlayerConfig {
                start_health: 100,
                max_health: 100,
                start_ammo: 10,
                move_step: 0.15,
                rotation_step: 0.05,
                start_angle: PI / 4.0,
                door_radius: 1.5,
                pickup_radius: 0.8,
                health_pickup: 25,
                ammo_pickup: 10,
            },
            weapon: WeaponConfig {
                model: WeaponModel::Projectile,
                damage: 25,
                kill_reward: 100,
                range: 10.0,
                march_step: 0.1,
                hit_radius: 0.5,
                projectile_speed: 8.0,
                projectile_capacity: 8,
            },
            enemy: EnemyConfig {
                max_health: 50,
                speed: 1.0,
                too_close: 0.8,
                attack_range: 1.2,
                attack_damage: 10,
                attack_cooldown: 1.0,
            },
            pacing: PacingConfig {
                ticks_per_second: 20,
                max_dt: 0.25,
            },
        }
    }
}

impl EngineConfig {
    /// Clamp values that would break the geometry to the smallest sane
    /// setting instead of rejecting them.
    pub fn validated(mut self) -> Self {
        self.screen.width = self.screen.width.max(8);
        self.screen.height = self.screen.height.max(4);
        if !self.camera.fov_degrees.is_finite() {
            self.camera.fov_degrees = 66.0;
        }
        self.camera.fov_degrees = self.camera.fov_degrees.clamp(10.0, 170.0);
        if !(self.camera.max_render_distance > 1.0) {
            self.camera.max_render_distance = 1.0;
        }
        if !(self.weapon.march_step > 0.0) {
            self.weapon.march_step = 0.1;
        }
        self.weapon.projectile_capacity = self.weapon.projectile_capacity.max(1);
        self.pacing.ticks_per_second = self.pacing.ticks_per_second.clamp(1, 240);
        if !(self.pacing.max_dt > 0.0) {
            self.pacing.max_dt = 0.25;
        }
        self
    }
}
