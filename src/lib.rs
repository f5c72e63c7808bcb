//! First-person raycasting engine for a text grid.
//!
//! A 2D tile map is projected into a pseudo-3D view one screen column at a
//! time.  `compute::step` advances the game, `render::compose` builds a
//! `Frame`, and a `FrameSink` (the crossterm presenter in `display`) shows it.

pub mod compute;
pub mod config;
pub mod display;
pub mod driver;
pub mod entities;
pub mod error;
pub mod frame;
pub mod input;
pub mod logging;
pub mod map;
pub mod raycast;
pub mod render;
pub mod sprites;
pub mod world;
